use tracing::{info, warn};

use crate::api::client::ApiClient;
use crate::auth::permissions::Permisos;
use crate::error::IntranetResult;
use crate::model::documento::{Documento, DocumentoId, DocumentoList};
use crate::routes;

#[derive(Clone)]
pub struct DocumentoService {
    client: ApiClient,
}

impl DocumentoService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Documents visible to the caller; the server hides non-public ones
    /// from other areas below level 3.
    pub async fn get_all(&self) -> IntranetResult<Vec<Documento>> {
        let list: DocumentoList = self.client.get(routes::DOCUMENTOS, &[]).await?;
        Ok(list.into())
    }

    pub async fn get_by_id(&self, id: DocumentoId) -> IntranetResult<Documento> {
        self.client.get(&routes::documento(id), &[]).await
    }

    /// File contents; the server counts it as a download.
    pub async fn download(&self, id: DocumentoId) -> IntranetResult<Vec<u8>> {
        let bytes = self.client.get_bytes(&routes::documento_download(id)).await?;
        info!(id = %id, size = bytes.len(), "Document downloaded");
        Ok(bytes)
    }

    /// Refused locally below level 3, the same line the server draws.
    pub async fn delete(&self, permisos: &Permisos, id: DocumentoId) -> IntranetResult<()> {
        if let Err(e) = permisos.require_documento_manager() {
            warn!(id = %id, nivel = permisos.nivel, "Refusing to delete a document");
            return Err(e);
        }
        self.client.delete(&routes::documento(id)).await?;
        info!(id = %id, "Document deleted");
        Ok(())
    }
}
