// Data model for the recommendation pipeline.
pub mod demand;
pub mod recommendation;
pub mod row;

pub use demand::{DemandSeries, ForecastEstimate, SalesFact, SkuSnapshot};
pub use recommendation::{
    Analysis, Recommendation, RowWarning, SortOrder, StockStatus, WarningKind,
};
pub use row::{RawTable, OPTIONAL_COLUMNS, REQUIRED_COLUMNS};
