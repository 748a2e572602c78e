//! Browser-side cosmetics that pages share.
//!
//! `fonts` owns the web font stylesheet and the saved font choice. Its DOM
//! and `localStorage` effects only run with the `csr` feature; the URL
//! building is plain string work and tested natively.

pub mod fonts;
