// Integration tests for the scan engine, its worker and its errors
// One module per area, sharing the tree builders in common

mod engine_tests;
mod worker_tests;
