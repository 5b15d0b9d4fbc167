mod csv_import;
mod normalize;

pub(crate) use csv_import::StatementReader;
pub(crate) use normalize::{Normalizer, RawRecord};
