//! Layout primitives shared by the recovery stages.
//!
//! - [`fragment`]: text fragments, image blocks and visual lines
//! - [`line_grouper`]: merging fragments into lines
//! - [`page_furniture`]: running page-number detection

pub mod fragment;
pub mod line_grouper;
pub mod page_furniture;

// Re-export main types
pub use fragment::{strip_subset_tag, Fragment, ImageBlock, Line};
pub use line_grouper::group_lines;
pub use page_furniture::{detect_page_furniture, PageFurniture};
