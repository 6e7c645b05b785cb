// Pipeline processing: table extraction, mapping, record building and quality checks

pub mod mapper;
pub mod normalize;
pub mod parser;
pub mod quality_gate;
pub mod record;

pub use mapper::{ContactField, FieldMapper, MappedFields, RecordField};
pub use quality_gate::{QualityAssessment, QualityGate, RequiredFieldsGate};
pub use record::CodeSystemRecord;
