//! Limits for union collapse and pipeline iteration.

/// Maximum number of members a union keeps before it is collapsed to a
/// homogeneous tuple, a common ancestor, or `Any`.
pub const DEFAULT_MAX_UNION_LEN: usize = 5;

/// Maximum passes of the default pipeline before its output is accepted.
/// Each pass can only shrink the expression, so real inputs settle in two or
/// three.
pub const MAX_REWRITE_PASSES: usize = 8;
