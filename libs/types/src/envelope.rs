//! Response envelope shared by list, detail and history responses
//!
//! Wire shape: `{"data": ..., "info": {"coins_num": n, "time": unix_secs}}`.

use serde::{Deserialize, Serialize};

/// Response metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// Item count: the full filtered set for lists, 1 for details,
    /// number of points for history.
    pub coins_num: usize,
    /// Server time in Unix seconds
    pub time: i64,
}

/// Payload plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub data: T,
    pub info: Info,
}

impl<T> ResponseEnvelope<T> {
    pub fn new(data: T, coins_num: usize, time: i64) -> Self {
        Self {
            data,
            info: Info { coins_num, time },
        }
    }

    pub fn into_data(self) -> T {
        self.data
    }
}

impl<T> ResponseEnvelope<Vec<T>> {
    /// Envelope whose count is the payload length.
    pub fn counted(data: Vec<T>, time: i64) -> Self {
        let coins_num = data.len();
        Self::new(data, coins_num, time)
    }
}
