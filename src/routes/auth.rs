use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};

use crate::forms::auth::LoginForm;
use crate::routes::{base_context, current_operator, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth::{ConfiguredOperator, login as login_service};

#[get("/login")]
pub async fn show_login(
    identity: Option<Identity>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if current_operator(identity.as_ref()).is_some() {
        return redirect("/admin");
    }

    let context: Context = base_context(&flash_messages, None, "login");
    render_template(&tera, "auth/login.html", &context)
}

#[post("/login")]
pub async fn login(
    request: HttpRequest,
    form: web::Form<LoginForm>,
    authenticator: web::Data<ConfiguredOperator>,
) -> impl Responder {
    match login_service(form.into_inner(), authenticator.get_ref()) {
        Ok(session) => match Identity::login(&request.extensions(), session.username) {
            Ok(_) => redirect("/admin"),
            Err(e) => {
                log::error!("Failed to attach operator identity: {e}");
                HttpResponse::InternalServerError().finish()
            }
        },
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Invalid username or password.").send();
            redirect("/login")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/login")
        }
        Err(err) => {
            log::error!("Failed to log in operator: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/logout")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    redirect("/")
}
