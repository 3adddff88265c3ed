use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Todo API", description = "Tasks and the accounts that own them"),
    nest(
        (path = "/v1", api = domain_tasks::TasksApiDoc),
        (path = "/v1", api = domain_accounts::AccountsApiDoc)
    )
)]
pub struct ApiDoc;
