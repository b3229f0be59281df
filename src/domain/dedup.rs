use std::collections::HashSet;
use std::hash::Hash;

/// 指紋が同じ要素のうち最初の1件だけを残す
///
/// 指紋は業務上のフィールドを束ねた型付きキーで、識別子は含めない。
/// 順序は保たれる。取り除いた件数を返す。
pub fn retain_first_by_key<T, K, F>(items: &mut Vec<T>, mut fingerprint: F) -> usize
where
    K: Hash + Eq,
    F: FnMut(&T) -> K,
{
    let before = items.len();
    let mut seen = HashSet::with_capacity(before);
    items.retain(|item| seen.insert(fingerprint(item)));
    before - items.len()
}
