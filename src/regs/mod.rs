pub mod ad7746;
pub mod adpd410x;
