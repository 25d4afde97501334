pub mod record;

pub mod record_store;

pub mod schema;

pub mod value_type;
