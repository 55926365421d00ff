pub mod cli;
pub mod collect;
pub mod dataset;
pub mod error;
pub mod forge;
pub mod model;
pub mod monthly;
pub mod normalize;
pub mod scale;
pub mod series;
pub mod summary;
pub mod util;
