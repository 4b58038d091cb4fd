use std::fmt;

use serde::{Deserialize, Deserializer};

/// HTTP 方法，缺失时默认为 GET
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 整个计划树的根
///
/// 根级 auth 作为继承的种子；解析完成后整棵树不再变化，
/// 由 Runner 独占持有，所有 VU 只读共享。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Collection {
    /// 根级授权描述（继承种子）
    pub auth: Auth,

    /// 顶层节点列表，按声明顺序执行
    pub item: Vec<Item>,
}

/// 计划树节点：一个请求步骤或一组子步骤
///
/// 节点可以同时携带请求和子节点；只有子节点的节点相当于文件夹。
/// 遍历为前序深度优先：节点自身的请求先于其子节点执行。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Item {
    /// 节点名称，仅用于展示
    pub name: String,

    /// 该节点要发出的请求（文件夹节点为空）
    pub request: Option<Request>,

    /// 节点自身的授权描述；空值表示继承最近祖先的授权
    pub auth: Auth,

    /// 有序子节点列表
    pub item: Vec<Item>,
}

impl Item {
    /// 计算本节点的有效授权
    ///
    /// 节点自身的 auth 非继承标记时覆盖继承值（对本节点及其子树生效），
    /// 否则继承值原样传递。
    pub fn effective_auth<'a>(&'a self, inherited: &'a Auth) -> &'a Auth {
        if self.auth.is_inherit() {
            inherited
        } else {
            &self.auth
        }
    }
}

/// 请求描述
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub header: Vec<Header>,
    pub body: Body,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Header {
    pub key: String,
    pub value: String,
}

/// 请求体描述
///
/// mode 决定使用哪个字段；未启用的表单字段保留在模型中，
/// 编码时被排除（保持解析保真度）。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Body {
    pub mode: BodyMode,
    pub raw: String,
    pub formdata: Vec<Field>,
    pub urlencoded: Vec<Field>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyMode {
    #[default]
    None,
    Raw,
    Formdata,
    Urlencoded,
}

/// 表单字段
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Field {
    pub key: String,
    pub value: String,
    pub enabled: bool,
}

/// 授权描述
///
/// kind 为类型标签；"无类型" 是继承标记，与 type = "none" 不同。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Auth {
    #[serde(rename = "type")]
    pub kind: AuthKind,

    pub basic: BasicAuth,
    pub bearer: BearerAuth,
    pub apikey: ApiKeyAuth,
}

impl Auth {
    /// 是否为继承标记（源中未声明 type）
    pub fn is_inherit(&self) -> bool {
        self.kind == AuthKind::Inherit
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthKind {
    /// 未声明 type，继承最近祖先的授权
    #[default]
    Inherit,
    None,
    Basic,
    Bearer,
    ApiKey,
}

impl<'de> Deserialize<'de> for AuthKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        match value.as_str() {
            "" => Ok(AuthKind::Inherit),
            "noauth" | "none" => Ok(AuthKind::None),
            "basic" => Ok(AuthKind::Basic),
            "bearer" => Ok(AuthKind::Bearer),
            "apikey" => Ok(AuthKind::ApiKey),
            other => Err(serde::de::Error::unknown_variant(
                other,
                &["noauth", "basic", "bearer", "apikey"],
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BearerAuth {
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiKeyAuth {
    pub key: String,
    pub value: String,

    /// key 写入位置：请求头或查询参数
    #[serde(rename = "in")]
    pub location: ApiKeyLocation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    #[default]
    Header,
    Query,
}
