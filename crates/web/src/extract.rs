//! Extractors whose rejections render as the JSON error body used by every
//! other failure of the API.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::WebError;

/// `axum::Json` rejecting with `WebError`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(WebError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Path` rejecting with `WebError`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(WebError))]
pub struct AppPath<T>(pub T);

/// `axum::extract::Query` rejecting with `WebError`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(WebError))]
pub struct AppQuery<T>(pub T);
