use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The two delivery fields this service exposes. Anything else the delivery
/// service returns is dropped on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeliveryStatus {
    pub numero_entrega: i64,
    pub entrega_realizada: bool,
}
