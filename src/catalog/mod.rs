// ComCat event catalog: the authority probe for incoming origins.
//
// The receiver only needs to know whether ComCat answers for an event id;
// the detail document itself is never inspected. The service sits behind
// the CatalogService trait so tests can substitute a stub.

pub mod client;
pub mod resolver;
