pub mod flow;
pub mod form;
pub mod handoff;
pub mod poller;
pub mod resolver;
pub mod selection;
pub mod widget;

pub use flow::{BookingFlow, FlowStep};
pub use form::{BookingForm, FormError, FormField};
pub use handoff::{HandoffState, PaymentHandoffBridge};
pub use poller::{PollOutcome, StatusPoller};
pub use resolver::{
    build_return_url, safe_return_path, PaymentOutcome, PaymentReturnResolver, RedirectParams, Resolution,
    ResolverDelays, ResolverState, ReturnNotice,
};
pub use selection::{BookingMode, BookingRequest, BookingSelection};
pub use widget::{escape_html, ScriptTagWidget};
