//! Screen flow controller: Login → Verify → Home.
//!
//! `App` owns the current flow state and the dependency container, starts and
//! stops the SMS listener around the verify screen, and turns dismissed
//! alerts into navigation.

use tokio::sync::mpsc;

use super::{Alert, LoginFlow, VerifyFlow};
use crate::kernel::AppDeps;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Verify,
    Home,
}

pub enum AppState {
    Login(LoginFlow),
    Verify(VerifyFlow),
    Home { mobile: String },
}

pub struct App {
    deps: AppDeps,
    state: AppState,
    sms_rx: Option<mpsc::Receiver<String>>,
}

impl App {
    pub fn new(deps: AppDeps) -> Self {
        Self {
            deps,
            state: AppState::Login(LoginFlow::new()),
            sms_rx: None,
        }
    }

    pub fn screen(&self) -> Screen {
        match self.state {
            AppState::Login(_) => Screen::Login,
            AppState::Verify(_) => Screen::Verify,
            AppState::Home { .. } => Screen::Home,
        }
    }

    pub fn login(&self) -> Option<&LoginFlow> {
        match &self.state {
            AppState::Login(flow) => Some(flow),
            _ => None,
        }
    }

    pub fn login_mut(&mut self) -> Option<&mut LoginFlow> {
        match &mut self.state {
            AppState::Login(flow) => Some(flow),
            _ => None,
        }
    }

    pub fn verify(&self) -> Option<&VerifyFlow> {
        match &self.state {
            AppState::Verify(flow) => Some(flow),
            _ => None,
        }
    }

    /// Mobile number shown on the home screen.
    pub fn home_mobile(&self) -> Option<&str> {
        match &self.state {
            AppState::Home { mobile } => Some(mobile),
            _ => None,
        }
    }

    /// Alert currently on screen, whichever flow raised it.
    pub fn current_alert(&self) -> Option<&Alert> {
        match &self.state {
            AppState::Login(flow) => flow.alert(),
            AppState::Verify(flow) => flow.alert(),
            AppState::Home { .. } => None,
        }
    }

    /// Send the OTP for the number entered on the login screen; on success
    /// the verify screen takes over with the number as immutable context.
    pub async fn submit_mobile(&mut self) {
        let mobile = match &mut self.state {
            AppState::Login(flow) => flow.send(self.deps.otp.as_ref()).await,
            _ => None,
        };
        if let Some(mobile) = mobile {
            self.enter_verify(mobile);
        }
    }

    /// Type one digit into the currently focused slot.
    pub async fn enter_digit(&mut self, digit: char) {
        if let AppState::Verify(flow) = &mut self.state {
            let index = flow.focus();
            flow.edit_slot(index, Some(digit), self.deps.otp.as_ref()).await;
        }
    }

    /// Backspace in the currently focused slot: delete its content if any,
    /// else move focus back one slot.
    pub async fn press_backspace(&mut self) {
        if let AppState::Verify(flow) = &mut self.state {
            let index = flow.focus();
            if flow.slots()[index].is_some() {
                flow.edit_slot(index, None, self.deps.otp.as_ref()).await;
            } else {
                flow.backspace(index);
            }
        }
    }

    /// Manual verify trigger (explicit submit of the current buffer).
    pub async fn submit_otp(&mut self) {
        if let AppState::Verify(flow) = &mut self.state {
            flow.verify(None, self.deps.otp.as_ref()).await;
        }
    }

    pub async fn resend_otp(&mut self) {
        if let AppState::Verify(flow) = &mut self.state {
            flow.resend(self.deps.otp.as_ref()).await;
        }
    }

    /// One second of wall time elapsed on the verify screen.
    pub fn tick(&mut self) {
        if let AppState::Verify(flow) = &mut self.state {
            flow.tick();
        }
    }

    /// Drain any auto-read SMS messages into the verify flow.
    pub async fn pump_sms(&mut self) {
        let Some(rx) = &mut self.sms_rx else {
            return;
        };
        let mut messages = Vec::new();
        while let Ok(message) = rx.try_recv() {
            messages.push(message);
        }

        if let AppState::Verify(flow) = &mut self.state {
            for message in messages {
                flow.on_sms(&message, self.deps.otp.as_ref()).await;
            }
        }
    }

    /// Dismiss the alert on screen; a success alert carrying a pending
    /// navigation moves the flow along.
    pub fn dismiss_alert(&mut self) {
        let navigate_home = match &mut self.state {
            AppState::Login(flow) => {
                flow.dismiss_alert();
                None
            }
            AppState::Verify(flow) => {
                let target = flow.dismiss_alert();
                (target == Some(Screen::Home)).then(|| flow.mobile().to_string())
            }
            AppState::Home { .. } => None,
        };

        if let Some(mobile) = navigate_home {
            self.leave_verify();
            self.state = AppState::Home { mobile };
        }
    }

    /// Back from the verify screen, discarding its buffer and countdown.
    pub fn back_to_login(&mut self) {
        if matches!(self.state, AppState::Verify(_)) {
            self.leave_verify();
            self.state = AppState::Login(LoginFlow::new());
        }
    }

    pub fn logout(&mut self) {
        if matches!(self.state, AppState::Home { .. }) {
            self.state = AppState::Login(LoginFlow::new());
        }
    }

    fn enter_verify(&mut self, mobile: String) {
        // Best-effort: None when the platform has no auto-read capability
        self.sms_rx = self.deps.sms.start();
        self.state = AppState::Verify(VerifyFlow::new(mobile));
    }

    fn leave_verify(&mut self) {
        self.deps.sms.stop();
        self.sms_rx = None;
    }
}
