// Two tiers, mirroring the router layout in main.rs:
// unauthenticated system endpoints, then the JWT-protected API
// (read catalog, TSV conversion, ETL admin trigger).

pub mod etl;
pub mod read;
pub mod system;
pub mod texttsv;
