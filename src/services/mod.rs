pub mod event_service;
pub mod file_service;
pub mod storage;
