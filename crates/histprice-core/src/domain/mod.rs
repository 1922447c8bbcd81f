//! 과거 시세 조회를 위한 도메인 모델.

mod calendar;
mod clock;
mod dates;
mod market_data;
mod range;

pub use calendar::*;
pub use clock::*;
pub use dates::*;
pub use market_data::*;
pub use range::*;
