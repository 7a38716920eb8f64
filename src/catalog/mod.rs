//! 声明式路由表
//!
//! 每个门户由若干资源组成，每个资源的每个端点对应一个存储过程。
//! 端点声明了参数从哪里取、按什么类型绑定，以及结果如何包装；
//! 通用控制器 [`crate::services::procedures`] 按这些声明执行。
//!
//! 路径形如 `/api/{portal}/{resource}{endpoint}`。同一资源内静态路径
//! 必须排在带参数的路径之前，否则 `/{id}` 会吞掉 `/list` 之类的请求。

pub mod admin;
pub mod lecturer;
pub mod mobile;
pub mod student;

use crate::models::auth::AssignType;

/// 门户：一组按账号类型授权的资源
#[derive(Debug)]
pub struct Portal {
    pub name: &'static str,
    pub roles: &'static [AssignType],
    pub resources: &'static [Resource],
}

impl Portal {
    pub fn scope_path(&self) -> String {
        format!("/api/{}", self.name)
    }
}

#[derive(Debug)]
pub struct Resource {
    pub path: &'static str,
    /// 用于消息文本，如 "Faculty"
    pub subject: &'static str,
    pub endpoints: &'static [Endpoint],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// 存储层的调用方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `Storage::query_paged`，返回 ListResponse
    Paged,
    /// `Storage::query`，取第一行
    One,
    /// `Storage::query`，返回全部行
    Many,
    /// `Storage::execute`，按 `@p_messages_json` 判定成败
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Get,
    Search,
    Filter,
    FormLoad,
    Report,
    Rows,
    Create,
    Update,
    Delete,
    Toggle,
    Review,
    Submit,
    Scan,
}

impl Action {
    pub fn operation(&self) -> Operation {
        match self {
            Action::List => Operation::Paged,
            Action::Get => Operation::One,
            Action::Search | Action::Filter | Action::FormLoad | Action::Report | Action::Rows => {
                Operation::Many
            }
            Action::Create
            | Action::Update
            | Action::Delete
            | Action::Toggle
            | Action::Review
            | Action::Submit
            | Action::Scan => Operation::Write,
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Get => "retrieve",
            Action::Search => "search",
            Action::Filter => "filter",
            Action::FormLoad => "load form data for",
            Action::Report => "generate report for",
            Action::Rows => "retrieve",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Toggle => "toggle",
            Action::Review => "review",
            Action::Submit => "submit",
            Action::Scan => "record",
        }
    }

    /// 读操作成功时的消息；写操作使用存储过程返回的第一条消息
    pub fn success_message(&self, subject: &str) -> String {
        match self {
            Action::List => format!("{subject} list retrieved successfully"),
            Action::FormLoad => format!("{subject} form data loaded successfully"),
            Action::Report => format!("{subject} report generated successfully"),
            Action::Search | Action::Filter => format!("{subject} results retrieved successfully"),
            Action::Get | Action::Rows => format!("{subject} retrieved successfully"),
            Action::Create => format!("{subject} created successfully"),
            Action::Update => format!("{subject} updated successfully"),
            Action::Delete => format!("{subject} deleted successfully"),
            Action::Toggle => format!("{subject} toggled successfully"),
            Action::Review => format!("{subject} reviewed successfully"),
            Action::Submit => format!("{subject} submitted successfully"),
            Action::Scan => format!("{subject} recorded successfully"),
        }
    }

    pub fn not_found_message(&self, subject: &str) -> String {
        format!("{subject} not found")
    }

    /// 存储层出错或写操作返回非 0 code 时的通用消息
    pub fn fallback_message(&self, subject: &str) -> String {
        format!("Failed to {} {}", self.verb(), subject.to_lowercase())
    }
}

/// 参数来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgSource {
    Path,
    Query,
    Body,
    User(UserField),
    /// 修正后的页码
    Page,
    /// 修正后的每页条数
    PageSize,
}

/// 从认证用户上取的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    UserId,
    /// 关联的讲师或学生 ID，账号未关联时请求被拒绝
    AssignTo,
    Username,
    Email,
    AssignType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Int,
    Decimal,
    Text,
    /// YYYY-MM-DD
    Date,
    /// HH:MM 或 HH:MM:SS，统一绑定为 HH:MM:SS
    Time,
    Bool,
    /// 任意 JSON，序列化为字符串后绑定
    Json,
    /// 明文密码，校验强度后以 argon2 哈希绑定
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub source: ArgSource,
    pub kind: ArgKind,
    pub required: bool,
}

impl ArgSpec {
    pub const fn optional(self) -> Self {
        Self {
            required: false,
            ..self
        }
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }
}

/// 路径参数，必填
pub const fn path(name: &'static str, kind: ArgKind) -> ArgSpec {
    ArgSpec {
        name,
        source: ArgSource::Path,
        kind,
        required: true,
    }
}

/// 路径中的 `{id}`
pub const ID: ArgSpec = path("id", ArgKind::Int);

/// 查询字符串参数，默认可选
pub const fn query(name: &'static str, kind: ArgKind) -> ArgSpec {
    ArgSpec {
        name,
        source: ArgSource::Query,
        kind,
        required: false,
    }
}

/// 请求体字段，默认必填
pub const fn body(name: &'static str, kind: ArgKind) -> ArgSpec {
    ArgSpec {
        name,
        source: ArgSource::Body,
        kind,
        required: true,
    }
}

pub const fn user(field: UserField) -> ArgSpec {
    let name = match field {
        UserField::UserId => "user_id",
        UserField::AssignTo => "assign_to",
        UserField::Username => "username",
        UserField::Email => "email",
        UserField::AssignType => "assign_type",
    };
    ArgSpec {
        name,
        source: ArgSource::User(field),
        kind: match field {
            UserField::UserId | UserField::AssignTo => ArgKind::Int,
            _ => ArgKind::Text,
        },
        required: true,
    }
}

pub const PAGE: ArgSpec = ArgSpec {
    name: "page",
    source: ArgSource::Page,
    kind: ArgKind::Int,
    required: true,
};

pub const PAGE_SIZE: ArgSpec = ArgSpec {
    name: "size",
    source: ArgSource::PageSize,
    kind: ArgKind::Int,
    required: true,
};

/// 列表搜索关键字 `?search=`
pub const SEARCH: ArgSpec = query("search", ArgKind::Text);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    /// 相对资源的路径，空串表示资源根
    pub path: &'static str,
    pub action: Action,
    pub procedure: &'static str,
    /// 按存储过程形参顺序排列，OUT 参数不在其中
    pub args: &'static [ArgSpec],
}

impl Endpoint {
    pub const fn new(
        method: HttpMethod,
        path: &'static str,
        action: Action,
        procedure: &'static str,
        args: &'static [ArgSpec],
    ) -> Self {
        Self {
            method,
            path,
            action,
            procedure,
            args,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.path.contains('{')
    }

    /// 路径上声明的 `{name}` 段
    pub fn path_params(&self) -> impl Iterator<Item = &'static str> {
        self.path
            .split('/')
            .filter_map(|seg| seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
    }
}

// 常用端点形状

pub const fn list(procedure: &'static str, args: &'static [ArgSpec]) -> Endpoint {
    Endpoint::new(HttpMethod::Get, "/list", Action::List, procedure, args)
}

pub const fn search(procedure: &'static str, args: &'static [ArgSpec]) -> Endpoint {
    Endpoint::new(HttpMethod::Get, "/search", Action::Search, procedure, args)
}

pub const fn filter(procedure: &'static str, args: &'static [ArgSpec]) -> Endpoint {
    Endpoint::new(HttpMethod::Post, "/filter", Action::Filter, procedure, args)
}

pub const fn formload(procedure: &'static str, args: &'static [ArgSpec]) -> Endpoint {
    Endpoint::new(HttpMethod::Get, "/formload", Action::FormLoad, procedure, args)
}

pub const fn get_by_id(procedure: &'static str, args: &'static [ArgSpec]) -> Endpoint {
    Endpoint::new(HttpMethod::Get, "/{id}", Action::Get, procedure, args)
}

pub const fn create(procedure: &'static str, args: &'static [ArgSpec]) -> Endpoint {
    Endpoint::new(HttpMethod::Post, "", Action::Create, procedure, args)
}

pub const fn update(procedure: &'static str, args: &'static [ArgSpec]) -> Endpoint {
    Endpoint::new(HttpMethod::Put, "/{id}", Action::Update, procedure, args)
}

pub const fn delete(procedure: &'static str, args: &'static [ArgSpec]) -> Endpoint {
    Endpoint::new(HttpMethod::Delete, "/{id}", Action::Delete, procedure, args)
}

pub static PORTALS: &[Portal] = &[
    admin::PORTAL,
    lecturer::PORTAL,
    student::PORTAL,
    mobile::PORTAL,
];

pub fn portals() -> &'static [Portal] {
    PORTALS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validate_procedure_name;
    use std::collections::HashSet;

    fn all_endpoints() -> impl Iterator<Item = (&'static Portal, &'static Resource, &'static Endpoint)> {
        portals().iter().flat_map(|portal| {
            portal.resources.iter().flat_map(move |resource| {
                resource
                    .endpoints
                    .iter()
                    .map(move |endpoint| (portal, resource, endpoint))
            })
        })
    }

    #[test]
    fn test_portal_names() {
        let names: Vec<_> = portals().iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec!["admin-portal", "lecturer-portal", "student-portal", "mobile-app"]
        );
    }

    #[test]
    fn test_procedure_names_are_valid_identifiers() {
        for (_, _, endpoint) in all_endpoints() {
            assert!(
                validate_procedure_name(endpoint.procedure).is_ok(),
                "invalid procedure name {}",
                endpoint.procedure
            );
        }
    }

    #[test]
    fn test_routes_are_unique() {
        let mut seen = HashSet::new();
        for (portal, resource, endpoint) in all_endpoints() {
            let key = (
                portal.name,
                resource.path,
                endpoint.path,
                endpoint.method.as_str(),
            );
            assert!(seen.insert(key), "duplicate route {key:?}");
        }
    }

    #[test]
    fn test_static_paths_precede_dynamic_paths() {
        for portal in portals() {
            for resource in portal.resources {
                let mut dynamic_seen = false;
                for endpoint in resource.endpoints {
                    if endpoint.is_dynamic() {
                        dynamic_seen = true;
                    } else {
                        assert!(
                            !dynamic_seen || endpoint.path.is_empty(),
                            "{}{}{} registered after a parameterised path",
                            portal.name,
                            resource.path,
                            endpoint.path
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_path_args_match_declared_segments() {
        for (portal, resource, endpoint) in all_endpoints() {
            let params: HashSet<_> = endpoint.path_params().collect();
            let path_args: HashSet<_> = endpoint
                .args
                .iter()
                .filter(|arg| arg.source == ArgSource::Path)
                .map(|arg| arg.name)
                .collect();
            assert_eq!(
                params, path_args,
                "{}{}{} path args mismatch",
                portal.name, resource.path, endpoint.path
            );
        }
    }

    #[test]
    fn test_list_endpoints_carry_paging() {
        for (_, _, endpoint) in all_endpoints() {
            if endpoint.action == Action::List {
                assert!(endpoint.args.contains(&PAGE), "{}", endpoint.procedure);
                assert!(endpoint.args.contains(&PAGE_SIZE), "{}", endpoint.procedure);
            }
        }
    }

    #[test]
    fn test_messages() {
        assert_eq!(Action::List.success_message("Faculty"), "Faculty list retrieved successfully");
        assert_eq!(Action::Get.not_found_message("Course"), "Course not found");
        assert_eq!(Action::Create.fallback_message("Faculty"), "Failed to create faculty");
        assert_eq!(Action::Create.success_message("Faculty"), "Faculty created successfully");
        assert_eq!(Action::Update.success_message("Class"), "Class updated successfully");
        assert_eq!(Action::Submit.success_message("Leave request"), "Leave request submitted successfully");
    }
}
