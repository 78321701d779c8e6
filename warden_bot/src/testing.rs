//! Recording fakes for the platform and the analyzer, shared with the server tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex,
        atomic::{AtomicI32, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use warden_core::{
    ai::{Analyzer, dto::UserContent, dto::Verdict},
    rules::RulesStore,
    store::MemoryStore,
};

use crate::{
    dependencies::BotDependencies,
    platform::{
        ChatPlatform,
        dto::{DownloadedFile, MemberStatus, PlatformError, Restriction},
    },
};

pub const BOT_USERNAME: &str = "warden_bot";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Send,
    Edit,
    Delete,
    MemberStatus,
    Download,
    Restrict,
    SetWebhook,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    Send {
        chat_id: i64,
        text: String,
        reply_to: Option<i32>,
    },
    Edit {
        chat_id: i64,
        message_id: i32,
        text: String,
    },
    Delete {
        chat_id: i64,
        message_id: i32,
    },
    MemberStatus {
        chat_id: i64,
        user_id: u64,
    },
    Download {
        file_id: String,
    },
    Restrict {
        chat_id: i64,
        user_id: u64,
        restriction: Restriction,
    },
    SetWebhook {
        url: String,
        secret_token: Option<String>,
    },
}

/// In-memory platform that records every call. Members not registered with
/// `with_member` fail the status lookup.
pub struct FakePlatform {
    members: HashMap<u64, MemberStatus>,
    files: HashMap<String, DownloadedFile>,
    failing: HashSet<Operation>,
    calls: Mutex<Vec<PlatformCall>>,
    next_message_id: AtomicI32,
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePlatform {
    pub fn new() -> Self {
        Self {
            members: HashMap::new(),
            files: HashMap::new(),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
            next_message_id: AtomicI32::new(1000),
        }
    }

    pub fn with_member(mut self, user_id: u64, status: MemberStatus) -> Self {
        self.members.insert(user_id, status);
        self
    }

    pub fn with_file(mut self, file_id: &str, path: &str, data: Vec<u8>) -> Self {
        self.files.insert(
            file_id.to_string(),
            DownloadedFile {
                path: path.to_string(),
                data,
            },
        );
        self
    }

    pub fn failing(mut self, operation: Operation) -> Self {
        self.failing.insert(operation);
        self
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Text of every sent message and every edit, in call order.
    pub fn texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::Send { text, .. } | PlatformCall::Edit { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn last_text(&self) -> Option<String> {
        self.texts().pop()
    }

    pub fn deleted(&self) -> Vec<i32> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::Delete { message_id, .. } => Some(message_id),
                _ => None,
            })
            .collect()
    }

    pub fn restrictions(&self) -> Vec<(u64, Restriction)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::Restrict {
                    user_id,
                    restriction,
                    ..
                } => Some((user_id, restriction)),
                _ => None,
            })
            .collect()
    }

    pub fn member_lookups(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, PlatformCall::MemberStatus { .. }))
            .count()
    }

    fn record(&self, call: PlatformCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, operation: Operation) -> Result<(), PlatformError> {
        if self.failing.contains(&operation) {
            return Err(PlatformError::Other(format!("{:?} rejected", operation)));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatPlatform for FakePlatform {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i32>,
    ) -> Result<i32, PlatformError> {
        self.record(PlatformCall::Send {
            chat_id,
            text: text.to_string(),
            reply_to,
        });
        self.check(Operation::Send)?;

        Ok(self.next_message_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
    ) -> Result<(), PlatformError> {
        self.record(PlatformCall::Edit {
            chat_id,
            message_id,
            text: text.to_string(),
        });
        self.check(Operation::Edit)
    }

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), PlatformError> {
        self.record(PlatformCall::Delete {
            chat_id,
            message_id,
        });
        self.check(Operation::Delete)
    }

    async fn member_status(
        &self,
        chat_id: i64,
        user_id: u64,
    ) -> Result<MemberStatus, PlatformError> {
        self.record(PlatformCall::MemberStatus { chat_id, user_id });
        self.check(Operation::MemberStatus)?;

        self.members
            .get(&user_id)
            .copied()
            .ok_or_else(|| PlatformError::Other(format!("user {} not found", user_id)))
    }

    async fn download_file(&self, file_id: &str) -> Result<DownloadedFile, PlatformError> {
        self.record(PlatformCall::Download {
            file_id: file_id.to_string(),
        });
        self.check(Operation::Download)?;

        self.files
            .get(file_id)
            .cloned()
            .ok_or_else(|| PlatformError::Other(format!("file {} not found", file_id)))
    }

    async fn restrict_member(
        &self,
        chat_id: i64,
        user_id: u64,
        restriction: Restriction,
    ) -> Result<(), PlatformError> {
        self.record(PlatformCall::Restrict {
            chat_id,
            user_id,
            restriction,
        });
        self.check(Operation::Restrict)
    }

    async fn set_webhook(
        &self,
        url: &str,
        secret_token: Option<&str>,
    ) -> Result<(), PlatformError> {
        self.record(PlatformCall::SetWebhook {
            url: url.to_string(),
            secret_token: secret_token.map(str::to_string),
        });
        self.check(Operation::SetWebhook)
    }
}

/// Returns a fixed verdict and remembers what it was asked.
pub struct ScriptedAnalyzer {
    verdict: Verdict,
    requests: Mutex<Vec<(String, UserContent)>>,
    count: AtomicUsize,
}

impl ScriptedAnalyzer {
    pub fn new(verdict: Verdict) -> Self {
        Self {
            verdict,
            requests: Mutex::new(Vec::new()),
            count: AtomicUsize::new(0),
        }
    }

    /// Verdict parsed from a raw model answer such as `"YES\nlink posted"`.
    pub fn answering(response: &str) -> Self {
        Self::new(Verdict::from_response(response))
    }

    pub fn call_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(String, UserContent)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Analyzer for ScriptedAnalyzer {
    async fn analyze(&self, system_prompt: &str, content: &UserContent) -> Verdict {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), content.clone()));
        self.verdict.clone()
    }
}

/// Handles to every fake behind a `BotDependencies`.
pub struct TestHarness {
    pub deps: BotDependencies,
    pub platform: Arc<FakePlatform>,
    pub store: Arc<MemoryStore>,
    pub analyzer: Arc<ScriptedAnalyzer>,
}

impl TestHarness {
    pub fn new(platform: FakePlatform, analyzer: ScriptedAnalyzer) -> Self {
        let platform = Arc::new(platform);
        let store = Arc::new(MemoryStore::new());
        let analyzer = Arc::new(analyzer);

        let deps = BotDependencies {
            platform: platform.clone(),
            rules: RulesStore::new(store.clone()),
            analyzer: analyzer.clone(),
            bot_username: BOT_USERNAME.to_string(),
        };

        Self {
            deps,
            platform,
            store,
            analyzer,
        }
    }
}
