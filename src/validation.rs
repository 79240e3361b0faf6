//! Form validation contract
//! 字段规则集中声明在表单类型上，统一产出字段错误列表，
//! 不再由各个界面各自手写校验

use crate::error::{ApiError, FieldError, Result};
use crate::models::{ArticlePayload, ProfileUpdate, RegisterRequest};
use validator::{Validate, ValidationErrors};

/// Run a form's declared rules, translating failures into the uniform
/// field-error list carried by [`ApiError::Validation`].
pub fn validate_form<T: Validate>(form: &T) -> Result<()> {
    form.validate().map_err(into_field_errors)
}

fn into_field_errors(errors: ValidationErrors) -> ApiError {
    let mut fields: Vec<FieldError> = Vec::new();
    for (field, errs) in errors.field_errors() {
        for e in errs {
            let message = e
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| e.code.to_string());
            fields.push(FieldError {
                field: field.to_string(),
                message,
            });
        }
    }
    // HashMap 遍历顺序不稳定，排序保证错误列表可预期
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    ApiError::Validation(fields)
}

/// Add/edit article form
#[derive(Debug, Clone, Default, Validate)]
pub struct ArticleDraft {
    #[validate(length(min = 5, max = 200, message = "标题长度需在 5 到 200 个字符之间"))]
    pub title: String,
    #[validate(length(min = 50, message = "内容至少需要 50 个字符"))]
    pub content: String,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl ArticleDraft {
    /// Build the request body, stripping blank optional fields on submit
    pub fn to_payload(&self) -> ArticlePayload {
        ArticlePayload {
            title: self.title.clone(),
            content: self.content.clone(),
            category: normalize_optional(&self.category),
            image_url: normalize_optional(&self.image_url),
        }
    }
}

/// Login form
#[derive(Debug, Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "请输入用户名"))]
    pub username: String,
    #[validate(length(min = 1, message = "请输入密码"))]
    pub password: String,
}

/// Registration form
#[derive(Debug, Clone, Default, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 3, max = 150, message = "用户名至少需要 3 个字符"))]
    pub username: String,
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: String,
    #[validate(length(min = 8, message = "密码至少需要 8 个字符"))]
    pub password: String,
    pub password_confirm: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Run the register form's field rules plus the cross-field
/// password-confirmation check
pub fn validate_register(form: &RegisterForm) -> Result<()> {
    let mut fields = match validate_form(form) {
        Ok(()) => Vec::new(),
        Err(ApiError::Validation(fields)) => fields,
        Err(other) => return Err(other),
    };

    if form.password != form.password_confirm {
        fields.push(FieldError {
            field: "password_confirm".to_string(),
            message: "两次输入的密码不一致".to_string(),
        });
        fields.sort_by(|a, b| a.field.cmp(&b.field));
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(fields))
    }
}

impl RegisterForm {
    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            first_name: normalize_optional(&self.first_name),
            last_name: normalize_optional(&self.last_name),
        }
    }
}

/// Profile edit form
#[derive(Debug, Clone, Default, Validate)]
pub struct ProfileForm {
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

impl ProfileForm {
    pub fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            email: normalize_optional(&self.email),
            first_name: normalize_optional(&self.first_name),
            last_name: normalize_optional(&self.last_name),
            bio: normalize_optional(&self.bio),
        }
    }
}

fn normalize_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
