pub mod autoscout;

pub use autoscout::autoscout24_be;
