pub mod publication;

pub use publication::{
    Author, ExternalIds, OpenAccessPdf, PaperRef, Publication, PublicationDetails, Tldr,
};
