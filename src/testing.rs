//! Test support: an in-memory [`Connector`] that replays canned candid
//! blobs and records every call, plus fixture builders for the common
//! wire records. Lives in the crate proper so integration tests under
//! `tests/` can use it.

use crate::{
    actor::Connector,
    error::TransportError,
    wire::{
        self,
        WireAck,
        WireResult,
    },
};
use candid::{
    CandidType,
    Encode,
    Nat,
    Principal,
};
use std::{
    collections::{
        HashMap,
        VecDeque,
    },
    sync::{
        Arc,
        Mutex,
    },
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CallKind {
    Query,
    Update,
}

#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub method: String,
    pub args: Vec<u8>,
}

/// Connector double. Replies are queued per method name; a queue with
/// a single entry acts as a stable fixture and answers every call,
/// while longer queues are consumed one reply at a time.
#[derive(Clone, Default)]
pub struct FakeConnector {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    replies: HashMap<String, VecDeque<Vec<u8>>>,
    calls: Vec<RecordedCall>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stub_raw(&self, method: &str, blob: Vec<u8>) {
        let mut inner = self.inner.lock().expect("connector lock");
        inner.replies.entry(method.to_string()).or_default().push_back(blob);
    }

    /// Queues an `ok` reply carrying `value`.
    pub fn stub_ok<T: CandidType>(&self, method: &str, value: T) {
        let reply: WireResult<T> = WireResult::Ok(value);
        self.stub_raw(method, Encode!(&reply).expect("encode stub"));
    }

    /// Queues an `err` reply with the given reason.
    pub fn stub_err(&self, method: &str, reason: &str) {
        let reply = WireAck::Err(reason.to_string());
        self.stub_raw(method, Encode!(&reply).expect("encode stub"));
    }

    /// Queues a payload-free `ok` acknowledgement.
    pub fn stub_ack(&self, method: &str) {
        self.stub_raw(method, Encode!(&WireAck::Ok).expect("encode stub"));
    }

    /// Queues an untagged reply, for methods that return plain values.
    pub fn stub_plain<T: CandidType>(&self, method: &str, value: T) {
        self.stub_raw(method, Encode!(&value).expect("encode stub"));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.lock().expect("connector lock").calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().expect("connector lock").calls.len()
    }

    pub fn calls_for(&self, method: &str) -> usize {
        self.inner
            .lock()
            .expect("connector lock")
            .calls
            .iter()
            .filter(|call| call.method == method)
            .count()
    }

    fn respond(
        &self,
        kind: CallKind,
        method: &str,
        args: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError> {
        let mut inner = self.inner.lock().expect("connector lock");
        inner.calls.push(RecordedCall {
            kind,
            method: method.to_string(),
            args,
        });
        let queue = inner
            .replies
            .get_mut(method)
            .filter(|queue| !queue.is_empty())
            .ok_or_else(|| TransportError(format!("no stubbed reply for {method}")))?;
        if queue.len() > 1 {
            Ok(queue.pop_front().unwrap_or_default())
        } else {
            Ok(queue.front().cloned().unwrap_or_default())
        }
    }
}

impl Connector for FakeConnector {
    async fn query(&self, method: &str, args: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        self.respond(CallKind::Query, method, args)
    }

    async fn update(&self, method: &str, args: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        self.respond(CallKind::Update, method, args)
    }
}

// ---------- fixtures ----------

pub fn principal(n: u8) -> Principal {
    Principal::from_slice(&[n; 8])
}

pub fn game_view(game_id: &str, status: wire::GameStatusDto) -> wire::GameViewDto {
    wire::GameViewDto {
        game_id: game_id.to_string(),
        name: format!("game {game_id}"),
        host: principal(1),
        mode: wire::GameModeDto::Line,
        token_type: wire::TokenTypeDto::Icp,
        entry_fee: Nat::from(2u64),
        host_fee_percent: Nat::from(5u64),
        status,
        players: vec![principal(1)],
        created_at: 1_700_000_000_000_000_000,
    }
}

pub fn game_detail(game_id: &str, status: wire::GameStatusDto) -> wire::GameDetailDto {
    wire::GameDetailDto {
        game: game_view(game_id, status),
        host: wire::ProfileDto {
            principal: principal(1),
            username: vec!["host-uno".to_string()],
        },
        players: vec![wire::PlayerSummaryDto {
            principal: principal(1),
            username: vec!["host-uno".to_string()],
            tablas: vec![1],
        }],
        draw_history: Vec::new(),
        chat: Vec::new(),
    }
}

pub fn tabla(tabla_id: u32) -> wire::TablaInfoDto {
    wire::TablaInfoDto {
        tabla_id,
        cards: (1..=16).collect(),
        rarity: "gold trim".to_string(),
        rental_fee: Nat::from(10_000_000u64),
        owner: principal(2),
        status: wire::TablaStatusDto::Available,
        image: Vec::new(),
    }
}

pub fn failed_claim(game_id: &str) -> wire::FailedClaimDto {
    wire::FailedClaimDto {
        game_id: game_id.to_string(),
        tabla_id: 7,
        payouts: vec![
            wire::PayoutShareDto {
                role: wire::PayeeRoleDto::Winner,
                payee: principal(3),
                amount: Nat::from(180_000_000u64),
                paid: true,
            },
            wire::PayoutShareDto {
                role: wire::PayeeRoleDto::Host,
                payee: principal(1),
                amount: Nat::from(10_000_000u64),
                paid: false,
            },
        ],
        last_error: "host transfer failed".to_string(),
        failed_at: 1_700_000_100_000_000_000,
    }
}
