use nevado_core::{BookingGateway, CoreError, CoreResult};
use nevado_shared::BookingRecord;
use reqwest::Url;

use crate::form::BookingForm;
use crate::poller::{PollOutcome, StatusPoller};
use crate::resolver::{safe_return_path, PaymentOutcome, ReturnNotice};
use crate::selection::{BookingRequest, BookingSelection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    SelectingDate,
    FillingForm,
    AwaitingPayment,
    PollingStatus,
    Confirmed,
    Failed,
}

impl FlowStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowStep::SelectingDate => "SELECTING_DATE",
            FlowStep::FillingForm => "FILLING_FORM",
            FlowStep::AwaitingPayment => "AWAITING_PAYMENT",
            FlowStep::PollingStatus => "POLLING_STATUS",
            FlowStep::Confirmed => "CONFIRMED",
            FlowStep::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowStep::Confirmed | FlowStep::Failed)
    }
}

/// Step sequencing of the booking modal:
/// `selecting_date -> filling_form -> awaiting_payment -> (polling_status) -> confirmed | failed`
#[derive(Debug)]
pub struct BookingFlow {
    step: FlowStep,
    selection: BookingSelection,
    form: BookingForm,
    booking: Option<BookingRecord>,
    payment_reference: Option<String>,
    last_error: Option<String>,
}

impl BookingFlow {
    pub fn open(selection: BookingSelection) -> Self {
        tracing::debug!("Booking flow opened for tour {}", selection.tour().tour_id);
        Self {
            step: FlowStep::SelectingDate,
            selection,
            form: BookingForm::default(),
            booking: None,
            payment_reference: None,
            last_error: None,
        }
    }

    /// Start over for a new booking, whatever the current step
    pub fn reopen(&mut self, selection: BookingSelection) {
        *self = Self::open(selection);
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    pub fn selection(&self) -> &BookingSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> CoreResult<&mut BookingSelection> {
        self.require(FlowStep::SelectingDate, FlowStep::SelectingDate)?;
        Ok(&mut self.selection)
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> CoreResult<&mut BookingForm> {
        self.require(FlowStep::FillingForm, FlowStep::FillingForm)?;
        Ok(&mut self.form)
    }

    pub fn booking(&self) -> Option<&BookingRecord> {
        self.booking.as_ref()
    }

    pub fn payment_reference(&self) -> Option<&str> {
        self.payment_reference.as_deref()
    }

    /// Message of the last failed action, for display
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn continue_to_form(&mut self) -> CoreResult<()> {
        self.require(FlowStep::SelectingDate, FlowStep::FillingForm)?;
        if !self.selection.is_complete() {
            return Err(CoreError::Validation("Select a departure or a date first".to_string()));
        }
        self.transition(FlowStep::FillingForm);
        Ok(())
    }

    pub fn back(&mut self) -> CoreResult<()> {
        self.require(FlowStep::FillingForm, FlowStep::SelectingDate)?;
        self.transition(FlowStep::SelectingDate);
        Ok(())
    }

    /// Create the booking server-side. Exactly one create/join call per invocation;
    /// on failure the form stays open for an explicit resubmit.
    pub async fn submit(&mut self, gateway: &dyn BookingGateway) -> CoreResult<&BookingRecord> {
        self.require(FlowStep::FillingForm, FlowStep::AwaitingPayment)?;

        let contact = self
            .form
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        let request = self.selection.to_request(contact)?;

        let result = match &request {
            BookingRequest::Private(request) => gateway.create_private_booking(request).await,
            BookingRequest::Join(request) => gateway.join_public_departure(request).await,
        };

        match result {
            Ok(record) => {
                tracing::info!("Booking {} created, awaiting payment", record.booking_id);
                self.last_error = None;
                self.transition(FlowStep::AwaitingPayment);
                let record: &BookingRecord = self.booking.insert(record);
                Ok(record)
            }
            Err(e) => {
                tracing::warn!("Booking submission failed: {}", e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// The always-available "I already paid" action
    pub async fn check_payment(&mut self, poller: &StatusPoller) -> CoreResult<FlowStep> {
        if !matches!(self.step, FlowStep::AwaitingPayment | FlowStep::PollingStatus) {
            return Err(self.invalid(FlowStep::PollingStatus));
        }
        let Some(booking_id) = self.booking.as_ref().map(|b| b.booking_id.clone()) else {
            return Err(self.invalid(FlowStep::PollingStatus));
        };

        self.transition(FlowStep::PollingStatus);
        match poller.check(&booking_id).await {
            Ok(PollOutcome::Confirmed) => self.transition(FlowStep::Confirmed),
            Ok(PollOutcome::Failed) => self.transition(FlowStep::Failed),
            Ok(PollOutcome::Pending) => self.transition(FlowStep::AwaitingPayment),
            Err(e) => {
                self.last_error = Some(e.to_string());
                self.transition(FlowStep::AwaitingPayment);
                return Err(e);
            }
        }
        Ok(self.step)
    }

    /// Jump straight to the terminal step reported by the payment return URL.
    /// Unguarded on purpose: the return page reopens the modal fresh, from any step.
    pub fn apply_return_notice(&mut self, notice: &ReturnNotice) {
        self.payment_reference = notice.reference.clone();
        match notice.outcome {
            PaymentOutcome::Approved => self.transition(FlowStep::Confirmed),
            PaymentOutcome::Failed => self.transition(FlowStep::Failed),
        }
    }

    /// Link to the payment bridge page for the created booking
    pub fn bridge_link(&self, bridge_path: &str, return_path: &str) -> CoreResult<String> {
        let Some(booking) = &self.booking else {
            return Err(self.invalid(FlowStep::AwaitingPayment));
        };
        let mut url = Url::parse("http://localhost/")
            .and_then(|root| root.join(safe_return_path(Some(bridge_path))))
            .map_err(|e| CoreError::Validation(format!("Invalid bridge path: {}", e)))?;
        if url.path().starts_with("//") {
            return Err(CoreError::Validation(format!("Invalid bridge path: {}", bridge_path)));
        }
        url.query_pairs_mut()
            .append_pair("bookingId", &booking.booking_id)
            .append_pair("returnPath", safe_return_path(Some(return_path)));

        Ok(format!("{}?{}", url.path(), url.query().unwrap_or_default()))
    }

    fn require(&self, expected: FlowStep, to: FlowStep) -> CoreResult<()> {
        if self.step != expected {
            return Err(self.invalid(to));
        }
        Ok(())
    }

    fn invalid(&self, to: FlowStep) -> CoreError {
        CoreError::InvalidTransition {
            from: self.step.as_str().to_string(),
            to: to.as_str().to_string(),
        }
    }

    fn transition(&mut self, to: FlowStep) {
        tracing::debug!("Booking flow {} -> {}", self.step.as_str(), to.as_str());
        self.step = to;
    }
}
