use std::sync::Arc;

use tokio::sync::{
    mpsc::{self, UnboundedReceiver, UnboundedSender},
    oneshot,
};

use crate::{cards::Catalog, err, Res};

use super::{CardDetail, CollectionView, PackOpening, Session};

pub enum SessionRequest {
    OpenPack(String, oneshot::Sender<Option<PackOpening>>),
    Collection(oneshot::Sender<CollectionView>),
    CardDetail(u32, oneshot::Sender<Option<CardDetail>>),
}

/// Owns the session and handles requests one at a time, so a pack opening
/// always finishes recording and saving before anything else sees the
/// collection.
struct SessionServer {
    session: Session,
    chan: UnboundedReceiver<SessionRequest>,
}

impl SessionServer {
    async fn run(&mut self) {
        while let Some(req) = self.chan.recv().await {
            match req {
                SessionRequest::OpenPack(pack, reply) => {
                    reply.send(self.session.open_pack(&pack)).ok();
                }
                SessionRequest::Collection(reply) => {
                    reply.send(self.session.collection_view()).ok();
                }
                SessionRequest::CardDetail(card, reply) => {
                    reply.send(self.session.card_detail(card)).ok();
                }
            }
        }
        tracing::debug!("All session handles dropped, stopping session server.");
    }
}

/// Cloneable handle used by request handlers to talk to the session task.
/// The catalog is immutable so it is shared directly rather than going
/// through the task.
#[derive(Clone)]
pub struct SessionHandle {
    chan: UnboundedSender<SessionRequest>,
    catalog: Arc<Catalog>,
}

impl SessionHandle {
    /// Move the session onto its own task. Must be called from within a tokio
    /// runtime.
    pub fn spawn(session: Session) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let catalog = Arc::clone(session.catalog());
        let mut server = SessionServer { session, chan: rx };
        tokio::spawn(async move { server.run().await });
        Self { chan: tx, catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> SessionRequest,
    ) -> Res<T> {
        let (tx, rx) = oneshot::channel();
        if self.chan.send(make(tx)).is_err() {
            return err("Session server has stopped.");
        }
        rx.await.map_err(|_| "Session server dropped request.".to_string())
    }

    pub async fn open_pack(&self, pack_id: &str) -> Res<Option<PackOpening>> {
        let pack_id = pack_id.to_string();
        self.request(|tx| SessionRequest::OpenPack(pack_id, tx)).await
    }

    pub async fn collection(&self) -> Res<CollectionView> {
        self.request(SessionRequest::Collection).await
    }

    pub async fn card_detail(&self, card_id: u32) -> Res<Option<CardDetail>> {
        self.request(|tx| SessionRequest::CardDetail(card_id, tx)).await
    }
}
