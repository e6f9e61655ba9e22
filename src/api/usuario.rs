use uuid::Uuid;

use crate::api::client::ApiClient;
use crate::error::IntranetResult;
use crate::model::usuario::Usuario;
use crate::routes;

#[derive(Clone)]
pub struct UsuarioService {
    client: ApiClient,
}

impl UsuarioService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The authenticated user, balances and role flags included.
    pub async fn me(&self) -> IntranetResult<Usuario> {
        self.client.get(routes::USUARIOS_ME, &[]).await
    }

    pub async fn get(&self, id: Uuid) -> IntranetResult<Usuario> {
        self.client.get(&routes::usuario(id), &[]).await
    }
}
