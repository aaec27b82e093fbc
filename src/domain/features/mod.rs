//! Feature engineering - raw applicant records to canonical model input.

pub(crate) mod applicant;
mod feature;
mod transformer;

pub use applicant::RawApplicant;
pub use feature::{Feature, FeatureVector, FEATURE_COUNT};
pub use transformer::{
    CategoryEncoder, FeatureTransformer, TransformerParams, UnseenCategoryPolicy,
    DEFAULT_AGE_CAP, UNKNOWN_CATEGORY_CODE,
};
