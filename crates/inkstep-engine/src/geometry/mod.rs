// geometry/mod.rs
//
// Point-sequence geometry shared by the morph and hint pipelines.
// Everything downstream works on fixed-length, index-aligned point arrays.

pub mod correspondence;
pub mod outline;
pub mod path;
pub mod polyline;

pub use correspondence::{align_closed, total_distance, Alignment};
pub use outline::{build_outline, ensure_orientation, signed_area, Winding};
pub use path::{flatten_subpaths, parse_path, to_path_string, PathError};
pub use polyline::{ensure_closed, polyline_length, resample, resample_closed, ArcLengthTable};
