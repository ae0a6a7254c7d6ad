pub mod classifier;
pub mod opener;
