//! Низкоуровневое чтение/запись полей заголовка по смещению.

pub mod read;
pub mod write;
