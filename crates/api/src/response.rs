use serde::Serialize;

/// Every successful JSON body is wrapped as `{ "data": ... }`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
