//! Trellis Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Trellis layout
//! engine and its command-line front end. It includes:
//!
//! - **Identifiers**: String-interned node and edge identifiers ([`identifier::Id`])
//! - **Geometry**: Points, sizes and bounding boxes ([`geometry`] module)
//! - **Elements**: Layout nodes, edges, handles and line styles ([`element`] module)

pub mod element;
pub mod geometry;
pub mod identifier;
