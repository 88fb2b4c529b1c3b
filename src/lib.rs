//! annotbl: converts projected gene annotations into NCBI feature tables.

pub mod error;

pub mod biotype;
pub mod cds;
pub mod cli;
pub mod config;
pub mod convert;
pub mod feature_table;
pub mod frame;
pub mod genepred;
pub mod interval;
pub mod loader;
pub mod perf;
pub mod strand;
pub mod transcript;
