use ntex::{http, web};
use serde::Serialize;
use serde_json::json;

use crate::{
    api::{
        self,
        checkout::{CheckoutForm, CheckoutOutcome, CheckoutProps},
        validation::CheckoutSchema,
    },
    front::{AppState, errors, forms, middleware, templates},
    models::checkout::{CardBrand, CheckoutField},
};

/// Input as the template draws it
#[derive(Serialize, Debug)]
struct FieldView<'a> {
    name: String,
    label: &'static str,
    placeholder: &'static str,
    input_type: &'static str,
    input_mode: &'static str,
    autocomplete: &'static str,
    max_length: usize,
    value: &'a str,
    errors: &'a [String],
}

fn field_view(form: &CheckoutForm, field: CheckoutField, show_errors: bool) -> FieldView<'_> {
    let (input_type, input_mode, autocomplete, max_length) = match field {
        CheckoutField::Email => ("email", "email", "email", 254),
        CheckoutField::CardNumber => ("text", "numeric", "cc-number", 19),
        CheckoutField::CardExpire => ("text", "numeric", "cc-exp", 5),
        CheckoutField::Cvv => ("text", "numeric", "cc-csc", 4),
    };

    FieldView {
        name: field.to_string(),
        label: field.label(),
        placeholder: field.placeholder(),
        input_type,
        input_mode,
        autocomplete,
        max_length,
        value: form.value(field).unwrap_or_default(),
        errors: if show_errors {
            form.field_errors(field)
        } else {
            &[]
        },
    }
}

/// Template context for the checkout form.
///
/// `show_errors` decides which inputs display their inline messages, a fresh
/// page shows none while a rejected submit shows all of them.
fn checkout_context(
    form: &CheckoutForm,
    props: &CheckoutProps,
    show_errors: impl Fn(CheckoutField) -> bool,
    toast: Option<&str>,
) -> tera::Result<tera::Context> {
    let fields = CheckoutField::ALL
        .iter()
        .map(|field| field_view(form, *field, show_errors(*field)))
        .collect::<Vec<_>>();

    let brand = form.brand().map(|brand: CardBrand| {
        json!({
            "name": brand.to_string(),
            "slug": brand.slug(),
        })
    });

    tera::Context::from_value(json!({
        "fields": fields,
        "brand": brand,
        "submit_text": &props.submit_text,
        "loading": props.loading,
        "submit_disabled": form.submit_disabled(props),
        "toast": toast,
        "oob": false,
    }))
}

fn render_template(
    template_name: &str,
    context: tera::Result<tera::Context>,
) -> Result<String, tera::Error> {
    templates::WEB_TEMPLATES.render(template_name, &context?)
}

fn html_response(status: http::StatusCode, content: String) -> web::HttpResponse {
    web::HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(content)
}

#[web::get("")]
async fn get_checkout_view(
    app_state: web::types::State<AppState>,
    session: ntex_session::Session,
) -> Result<impl web::Responder, web::Error> {
    let csrf_token = middleware::csrf_token::issue_csrf_token(&app_state, &session)?;

    let form = CheckoutForm::new(CheckoutSchema::default());
    let context = checkout_context(&form, &app_state.checkout_props, |_| false, None).map(
        |mut context| {
            context.insert("csrf_token", &csrf_token);
            context
        },
    );

    let content = render_template("checkout.html", context).map_err(|e| {
        errors::ServerError::TemplateError(format!(
            "at /checkout endpoint the template couldnt be rendered: {e}"
        ))
    })?;

    Ok(html_response(http::StatusCode::OK, content))
}

/// Reads the input that fired the htmx request
fn get_changed_field(req: &web::HttpRequest) -> Option<CheckoutField> {
    req.headers()
        .get("HX-Trigger-Name")
        .and_then(|v| v.to_str().ok())
        .and_then(|name| name.parse::<CheckoutField>().ok())
}

/// The edited input is sent back only when its formatter changed what the
/// user typed, every other input stays untouched in the browser.
fn reformatted_field(
    form: &CheckoutForm,
    form_data: &forms::checkout::CheckoutFormData,
    changed: Option<CheckoutField>,
) -> Option<CheckoutField> {
    changed
        .filter(|field| matches!(field, CheckoutField::CardNumber | CheckoutField::CardExpire))
        .filter(|field| form.value(*field).unwrap_or_default() != form_data.value(*field))
}

/// Live feedback while typing: inline errors, brand indicator, submit button
/// state and the reformatted input, all swapped out of band.
///
/// Inline errors are shown for the input being edited and for the ones that
/// already hold a value.
#[web::post("/field")]
async fn refresh_checkout_form(
    req: web::HttpRequest,
    app_state: web::types::State<AppState>,
    form_data: web::types::Form<forms::checkout::CheckoutFormData>,
) -> Result<impl web::Responder, web::Error> {
    let changed = get_changed_field(&req);
    let form = form_data.to_checkout_form(CheckoutSchema::default());
    let reformatted = reformatted_field(&form, &form_data, changed)
        .map(|field| field_view(&form, field, false));

    let context = checkout_context(
        &form,
        &app_state.checkout_props,
        |field| Some(field) == changed || form.value(field).is_some(),
        None,
    )
    .map(|mut context| {
        context.insert("oob", &true);
        context.insert("reformatted", &reformatted);
        context
    });

    let content = render_template("widgets/checkout_feedback.html", context).map_err(|e| {
        errors::ServerError::WidgetTemplateError(format!(
            "at /checkout/field endpoint the template couldnt be rendered: {e}"
        ))
    })?;

    Ok(html_response(http::StatusCode::OK, content))
}

#[web::post("")]
async fn submit_checkout_form(
    app_state: web::types::State<AppState>,
    session: ntex_session::Session,
    form_data: web::types::Form<forms::checkout::CheckoutFormData>,
) -> Result<impl web::Responder, web::Error> {
    middleware::csrf_token::verify_csrf_token(&app_state, &session, &form_data.csrf_token)?;

    let form = form_data.to_checkout_form(CheckoutSchema::default());

    let outcome = api::checkout::submit_checkout(&form, &app_state.checkout_handler)
        .await
        .map_err(|e| {
            errors::ServerError::ExternalServiceError(format!("at /checkout submit: {e}"))
        })?;

    let (status, template_name, context) = match outcome {
        CheckoutOutcome::Rejected(rejected) => (
            http::StatusCode::UNPROCESSABLE_ENTITY,
            "checkout.html",
            checkout_context(
                &form,
                &app_state.checkout_props,
                |_| true,
                Some(rejected.toast.as_str()),
            )
            .map(|mut context| {
                context.insert("csrf_token", &form_data.csrf_token);
                context
            }),
        ),
        CheckoutOutcome::Accepted(values) => (
            http::StatusCode::OK,
            "checkout_success.html",
            tera::Context::from_value(json!({
                "email": values.email,
                "brand": form.brand().map(|b| b.to_string()),
                "masked_card_number": api::card::mask_card_number(&values.card_number),
            })),
        ),
    };

    let content = render_template(template_name, context).map_err(|e| {
        errors::ServerError::TemplateError(format!(
            "at /checkout submit the template {template_name} couldnt be rendered: {e}"
        ))
    })?;

    Ok(html_response(status, content))
}
