//! Loading of edge lists and label matrices from csv files

pub mod csv;
