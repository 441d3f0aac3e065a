//! Cluster definitions used by the interview pipeline. Only the Basic
//! cluster is read; everything else on a joiner is left alone.

pub mod basic_information;
