use std::sync::{mpsc, Arc};
use std::thread;

use refiner_logging::{refiner_info, refiner_warn};

use crate::client::{ApiClient, ClientSettings, ReqwestApiClient};
use crate::{DownloadKind, EngineError, EngineEvent, InterviewQaRequest, RefineSubmission, RequestId};

/// Receives engine completions. Called from runtime worker threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    Refine {
        request_id: RequestId,
        submission: RefineSubmission,
    },
    Interview {
        request_id: RequestId,
        request: InterviewQaRequest,
    },
    Download {
        request_id: RequestId,
        kind: DownloadKind,
        text: String,
        file_type: String,
    },
}

/// Runs backend calls on a background tokio runtime. Each command becomes one
/// task; there is no cancellation, so an issued request always reports back.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let client = Arc::new(ReqwestApiClient::new(settings)?);
        Self::with_client(client, sink)
    }

    pub fn with_client(
        client: Arc<dyn ApiClient>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let sink = sink.clone();
                runtime.spawn(async move {
                    let event = handle_command(client.as_ref(), command).await;
                    sink.emit(event);
                });
            }
            refiner_info!("Engine command channel closed; shutting down runtime");
        });

        Ok(Self { cmd_tx })
    }

    pub fn refine(&self, request_id: RequestId, submission: RefineSubmission) {
        self.send(EngineCommand::Refine {
            request_id,
            submission,
        });
    }

    pub fn generate_interview_qa(&self, request_id: RequestId, request: InterviewQaRequest) {
        self.send(EngineCommand::Interview {
            request_id,
            request,
        });
    }

    pub fn download(
        &self,
        request_id: RequestId,
        kind: DownloadKind,
        text: impl Into<String>,
        file_type: impl Into<String>,
    ) {
        self.send(EngineCommand::Download {
            request_id,
            kind,
            text: text.into(),
            file_type: file_type.into(),
        });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            refiner_warn!("Engine worker is gone; dropping command");
        }
    }
}

async fn handle_command(client: &dyn ApiClient, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::Refine {
            request_id,
            submission,
        } => EngineEvent::RefineCompleted {
            request_id,
            result: client.refine_resume(&submission).await,
        },
        EngineCommand::Interview {
            request_id,
            request,
        } => EngineEvent::InterviewCompleted {
            request_id,
            result: client.generate_interview_qa(&request).await,
        },
        EngineCommand::Download {
            request_id,
            kind,
            text,
            file_type,
        } => EngineEvent::DownloadCompleted {
            request_id,
            result: client.download_artifact(kind, &text, &file_type).await,
        },
    }
}
