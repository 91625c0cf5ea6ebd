pub mod raw_item;
pub mod run;
pub mod video_row;

pub use raw_item::*;
pub use run::*;
pub use video_row::*;
