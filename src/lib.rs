// src/lib.rs

//! E-commerce admin/storefront backend. Product and category catalog data is
//! kept in two places: the relational store is canonical, and a denormalized
//! display copy lives in a document store. `services::catalog_sync` keeps the
//! two in step under update and delete; `services::cart_view` joins relational
//! cart rows with document-store product details for administrative viewing.

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod stores;
pub mod web;
