#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 書籍のスナップショット
///
/// 在庫は外部の書籍カタログが所有する。貸出側は書名で参照するだけで、
/// 数量はこの値ではなく常に`InventoryGateway::quantity`で読み直す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub title: String,
    pub available_quantity: u32,
}

/// 在庫ゲートウェイポート
///
/// 貸出コンテキストと書籍カタログの境界を維持する。
/// 貸出コンテキストが行うのは「書名で探す」「貸出可能数の読み書き」「保存」のみ。
///
/// 不変条件（貸出ストアと共同で維持）：貸出中の貸出1件につき貸出可能数が1減る。
pub trait InventoryGateway: Send + Sync {
    /// 書名で書籍を探す
    fn find_by_title(&self, title: &str) -> Option<Book>;

    /// 書籍の現在の貸出可能数
    fn quantity(&self, book: &Book) -> u32;

    /// 書籍の貸出可能数を設定する
    fn set_quantity(&self, book: &Book, quantity: u32);

    /// 在庫を永続化する
    fn save(&self) -> Result<()>;
}
