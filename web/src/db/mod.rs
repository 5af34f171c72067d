pub mod booking_repository;
pub mod entities;
pub mod pool;
