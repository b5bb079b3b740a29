/**
 * Routes Module
 * HTML page and JSON API route handlers
 */

pub mod admin;
pub mod admin_pages;
pub mod auth;
pub mod blog;
pub mod contact;
pub mod health;
pub mod pages;
pub mod upload;
