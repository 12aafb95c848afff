//! Steamline prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine, LineUpdate, QuantityChange},
    catalog::{Service, ServiceDraft},
    checkout::{CheckoutStage, EmptyCart, NewOrderRequest, PaymentMethod, PendingCheckout},
    dashboard::{DashboardSnapshot, DashboardStats, StatCard},
    ids::{OrderId, ServiceId, UserId},
    money::format_rupiah,
    orders::{DeliveryAction, Order, OrderCreated, OrderDetail, OrderItem},
    payment::{CashTender, PaymentError, PaymentReceipt},
    quantity::Quantity,
    receipt::{Receipt, ReceiptError},
    roles::{Access, Capability, Identity, Role, Route, User, authorize},
    status::{OrderStatus, PaymentStatus, Progress, StageState},
    tracking::{
        LogEntry, TrackingError, TrackingMode, TrackingRecord, TrackingSnapshot, TrackingState,
        normalize_order_id,
    },
};
