use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::api::{CarApi, LoginRequest};
use crate::config::NotificationConfig;
use crate::controller::CarListController;
use crate::error::{ClientError, ClientResult};
use crate::model::{Car, CarFields, CarLinks, Link, Locator};
use crate::notify::Notifications;
use crate::prompt::Prompter;
use crate::session::{Credential, CredentialStore};
use crate::types::Operation;

pub const FAKE_USER: &str = "admin";
pub const FAKE_PASSWORD: &str = "admin";
pub const FAKE_TOKEN: &str = "Bearer fake-token";

const BASE: &str = "http://localhost:8080/api/cars";

/// How the next call of an operation should fail
#[derive(Debug, Clone, Copy)]
pub enum FakeFailure {
    /// Server answers with this status
    Status(u16),
    /// Body cannot be decoded
    Garbled,
}

#[derive(Default)]
struct FakeState {
    cars: Vec<Car>,
    next_id: u64,
    calls: Vec<Operation>,
    failures: HashMap<Operation, FakeFailure>,
    last_body: Option<CarFields>,
    login_header: Option<String>,
}

/// In-memory stand-in for the carshop server
#[derive(Clone, Default)]
pub struct FakeCarApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeCarApi {
    pub fn seeded() -> Self {
        let api = Self::default();
        {
            let mut state = api.state.lock().unwrap();
            state.login_header = Some(FAKE_TOKEN.to_string());
            for (brand, model) in [("Ford", "Mustang"), ("Nissan", "Leaf"), ("Toyota", "Prius")] {
                let fields = CarFields {
                    brand: brand.to_string(),
                    model: model.to_string(),
                    color: "Silver".to_string(),
                    year: "2020".to_string(),
                    fuel: "Gasoline".to_string(),
                    price: "30000".to_string(),
                };
                Self::insert(&mut state, fields);
            }
        }
        api
    }

    fn insert(state: &mut FakeState, fields: CarFields) {
        state.next_id += 1;
        let href = format!("{}/{}", BASE, state.next_id);
        state.cars.push(Car {
            fields,
            links: CarLinks {
                self_link: Link { href: href.clone() },
                car: Some(Link { href }),
            },
        });
    }

    /// What `Authorization` the login endpoint answers with
    pub fn set_login_header(&self, header: Option<&str>) {
        self.state.lock().unwrap().login_header = header.map(str::to_string);
    }

    /// Append a record as-is, e.g. one reusing another record's self link
    pub fn push_raw(&self, car: Car) {
        self.state.lock().unwrap().cars.push(car);
    }

    pub fn fail_next(&self, operation: Operation, failure: FakeFailure) {
        self.state.lock().unwrap().failures.insert(operation, failure);
    }

    pub fn cars(&self) -> Vec<Car> {
        self.state.lock().unwrap().cars.clone()
    }

    pub fn calls(&self) -> Vec<Operation> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn last_body(&self) -> Option<CarFields> {
        self.state.lock().unwrap().last_body.clone()
    }

    fn begin(&self, operation: Operation, credential: Option<&Credential>) -> ClientResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(operation);

        if let Some(failure) = state.failures.remove(&operation) {
            return Err(match failure {
                FakeFailure::Status(status) => ClientError::Rejected { operation, status },
                FakeFailure::Garbled => ClientError::decode("expected value at line 1 column 1"),
            });
        }

        if operation != Operation::Login && credential.map(Credential::as_str) != Some(FAKE_TOKEN) {
            return Err(ClientError::Rejected { operation, status: 401 });
        }
        Ok(())
    }
}

#[async_trait]
impl CarApi for FakeCarApi {
    async fn login(&self, request: &LoginRequest) -> ClientResult<Credential> {
        self.begin(Operation::Login, None)?;
        let state = self.state.lock().unwrap();
        let valid = request.username == FAKE_USER && request.password == FAKE_PASSWORD;
        match (&state.login_header, valid) {
            (Some(token), true) if !token.trim().is_empty() => Ok(Credential::new(token.trim())),
            (_, true) => Err(ClientError::MissingToken { status: 200 }),
            (_, false) => Err(ClientError::MissingToken { status: 401 }),
        }
    }

    async fn list_cars(&self, credential: Option<&Credential>) -> ClientResult<Vec<Car>> {
        self.begin(Operation::Select, credential)?;
        Ok(self.cars())
    }

    async fn create_car(&self, credential: Option<&Credential>, fields: &CarFields) -> ClientResult<()> {
        self.begin(Operation::Create, credential)?;
        let mut state = self.state.lock().unwrap();
        state.last_body = Some(fields.clone());
        Self::insert(&mut state, fields.clone());
        Ok(())
    }

    async fn update_car(
        &self,
        credential: Option<&Credential>,
        target: &Locator,
        fields: &CarFields,
    ) -> ClientResult<()> {
        self.begin(Operation::Update, credential)?;
        let mut state = self.state.lock().unwrap();
        state.last_body = Some(fields.clone());
        match state.cars.iter_mut().find(|car| &car.edit_target() == target) {
            Some(car) => {
                car.fields = fields.clone();
                Ok(())
            }
            None => Err(ClientError::Rejected { operation: Operation::Update, status: 404 }),
        }
    }

    async fn delete_car(&self, credential: Option<&Credential>, locator: &Locator) -> ClientResult<()> {
        self.begin(Operation::Delete, credential)?;
        let mut state = self.state.lock().unwrap();
        let before = state.cars.len();
        state.cars.retain(|car| &car.locator() != locator);
        if state.cars.len() == before {
            return Err(ClientError::Rejected { operation: Operation::Delete, status: 404 });
        }
        Ok(())
    }
}

/// Prompter that records every dialog and answers confirmations from a
/// preset value (yes by default)
pub struct RecordingPrompter {
    answer: Mutex<bool>,
    confirmations: Mutex<Vec<String>>,
    alerts: Mutex<Vec<String>>,
}

impl Default for RecordingPrompter {
    fn default() -> Self {
        Self {
            answer: Mutex::new(true),
            confirmations: Mutex::new(Vec::new()),
            alerts: Mutex::new(Vec::new()),
        }
    }
}

impl RecordingPrompter {
    pub fn answer(&self, yes: bool) {
        *self.answer.lock().unwrap() = yes;
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prompter for RecordingPrompter {
    async fn confirm(&self, message: &str) -> bool {
        self.confirmations.lock().unwrap().push(message.to_string());
        *self.answer.lock().unwrap()
    }

    async fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

/// Controller over a fake API, optionally with the fake token already stored
pub fn controller_with(api: FakeCarApi, authenticated: bool) -> (CarListController, Arc<RecordingPrompter>) {
    let credentials = CredentialStore::new();
    if authenticated {
        credentials.store(Credential::new(FAKE_TOKEN));
    }
    let prompter = Arc::new(RecordingPrompter::default());
    let controller = CarListController::new(
        Arc::new(api),
        credentials,
        prompter.clone(),
        Notifications::new(NotificationConfig::default()),
    );
    (controller, prompter)
}
