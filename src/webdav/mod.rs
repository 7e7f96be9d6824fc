pub mod multistatus;
pub mod transport;
pub mod types;
pub mod xml;

pub use multistatus::{DavResource, parse_multistatus_bytes, parse_multistatus_bytes_visit};
pub use transport::{HyperTransport, Transport};
pub use types::{DavMethod, DavRequest, DavResponse, Depth, ICS_CONTENT_TYPE, XML_CONTENT_TYPE};
pub use xml::escape_xml;
