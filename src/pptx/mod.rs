//! Minimal PresentationML writer.
//!
//! Only what a picture-per-slide deck needs: a [`Presentation`] of blank
//! [`Slide`]s, each holding [`Picture`] shapes, serialised into an OPC zip
//! package by [`package`].

pub(crate) mod package;
mod presentation;
mod templates;

pub use presentation::{ImageFormat, Picture, Presentation, Slide};
