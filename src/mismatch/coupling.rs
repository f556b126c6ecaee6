//! Hidden coupling: files that change together with nothing in the code
//! explaining why.

/// Module membership of the two files of a pair. An unknown module never
/// counts as shared.
pub fn share_module(a: Option<&str>, b: Option<&str>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

/// `support > threshold`, no structural edge, and different modules.
///
/// A structural edge or a shared module explains the co-change, however
/// strong it is.
pub fn is_hidden_coupling(
    support: f64,
    structural_edge: bool,
    same_module: bool,
    threshold: f64,
) -> bool {
    support > threshold && !structural_edge && !same_module
}
