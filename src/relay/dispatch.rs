use tracing::{info, warn};

use crate::support::SupportApi;
use crate::types::{CaseFields, Command, NewCase, ReplyMessage};

pub const CASE_LANGUAGE: &str = "en";
pub const CASE_ISSUE_TYPE: &str = "technical";

pub const HELP_TEXT: &str = concat!(
    "AWS-[欢迎使用自动创建AWS工单钉钉机器人服务，本机器人目前支持3个功能。请注意换行以及英文逗号]\n\n",
    "[功能1：搜索AWS服务的serviceCode和categoryCode。请按以下格式输入]\n",
    "查找ServiceCode:{AWS服务名称，支持简写}\n\n",
    "[功能2：创建 AWS case。请按以下格式输入]\n",
    "提工单\nsubject:{case 主题}\nbody:{case 描述}\n",
    "severityCode:{low|normal|high|urgent|critical}\n",
    "serviceCode:{aws serviceCode}\ncategoryCode:{aws service categoryCode}\n\n",
    "[功能3：释放 AWS case。请按以下格式输入]\n",
    "释放case，case_id:{case_id}",
);

pub const CREATE_FAILED_TEXT: &str =
    "AWS-[创建工单失败]\n请输入正确的格式以及正确的 serviceCode 和 categoryCode";
pub const SERVICE_NOT_FOUND_TEXT: &str = "AWS-[请输入正确的 AWS Service 名称]";

/// Runs a parsed command against the Support API and renders the chat reply.
/// Upstream failures are logged and turned into fixed replies.
pub async fn dispatch(command: &Command, support: &dyn SupportApi) -> ReplyMessage {
    info!(command = command.kind(), "Dispatching command");

    let text = match command {
        Command::CreateCase(fields) => create_case(fields, support).await,
        Command::LookupServiceCode { service_name } => lookup_service(service_name, support).await,
        Command::ResolveCase { case_id } => resolve_case(case_id, support).await,
        Command::Unrecognized => HELP_TEXT.to_string(),
    };

    ReplyMessage::new(text)
}

async fn create_case(fields: &CaseFields, support: &dyn SupportApi) -> String {
    let case = NewCase {
        subject: fields.subject.clone(),
        communication_body: fields.body.clone(),
        service_code: fields.service_code.clone(),
        category_code: fields.category_code.clone(),
        severity_code: fields.severity_code.clone(),
        language: CASE_LANGUAGE.to_string(),
        issue_type: CASE_ISSUE_TYPE.to_string(),
    };

    match support.create_case(&case).await {
        Ok(case_id) => {
            info!(case_id = %case_id, "Created support case");
            format!("AWS-[创建工单成功]\ncase id: {}", case_id)
        }
        Err(e) => {
            warn!(
                service_code = %fields.service_code,
                category_code = %fields.category_code,
                "Failed to create support case: {}",
                e
            );
            CREATE_FAILED_TEXT.to_string()
        }
    }
}

// A failed resolve is always reported as an unknown case id, whatever the cause.
async fn resolve_case(case_id: &str, support: &dyn SupportApi) -> String {
    match support.resolve_case(case_id).await {
        Ok(()) => {
            info!(case_id, "Resolved support case");
            format!("AWS-[释放case成功]\ncase_id:{}已释放", case_id)
        }
        Err(e) => {
            warn!(case_id, "Failed to resolve support case: {}", e);
            format!("AWS-[释放case失败]\ncase_id:{}不存在", case_id)
        }
    }
}

async fn lookup_service(service_name: &str, support: &dyn SupportApi) -> String {
    let services = match support.list_services().await {
        Ok(services) => services,
        Err(e) => {
            warn!("Failed to list support services: {}", e);
            return SERVICE_NOT_FOUND_TEXT.to_string();
        }
    };

    let needle = service_name.to_lowercase();
    let found = services
        .iter()
        .find(|service| service.name.to_lowercase().contains(&needle));

    match found.map(serde_json::to_string) {
        Some(Ok(descriptor)) => format!("AWS-[serviceCode和categoryCode信息如下]\n{}", descriptor),
        Some(Err(e)) => {
            warn!("Failed to render service descriptor: {}", e);
            SERVICE_NOT_FOUND_TEXT.to_string()
        }
        None => SERVICE_NOT_FOUND_TEXT.to_string(),
    }
}
