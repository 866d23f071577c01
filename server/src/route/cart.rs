use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::identity::Caller;
use crate::request::{
    CartTransformer, CreateOrderItemRequest, DeleteOrderItemRequest, UpdateOrderItemRequest,
};
use crate::response::CartPresenter;
use application::service::{
    CreateOrderItemService, DeleteOrderItemService, GetCartService, UpdateOrderItemService,
};
use axum::extract::{Path, State};
use axum::routing::{get, patch};
use axum::{Json, Router};
use uuid::Uuid;

pub trait CartRouter {
    fn route_cart(self) -> Self;
}

impl CartRouter for Router<AppModule> {
    fn route_cart(self) -> Self {
        self.route(
            "/cart",
            get(
                |State(module): State<AppModule>, caller: Caller| async move {
                    Controller::new(CartTransformer, CartPresenter)
                        .intake(caller)
                        .handle(|dto| module.pgpool().get_cart(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 caller: Caller,
                 Json(req): Json<CreateOrderItemRequest>| async move {
                    Controller::new(CartTransformer, CartPresenter)
                        .try_intake((caller, req))?
                        .handle(|dto| module.pgpool().create_order_item(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/cart/:id",
            patch(
                |State(module): State<AppModule>,
                 caller: Caller,
                 Path(id): Path<Uuid>,
                 Json(req): Json<UpdateOrderItemRequest>| async move {
                    Controller::new(CartTransformer, CartPresenter)
                        .try_intake((caller, id, req))?
                        .handle(|dto| module.pgpool().update_order_item(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>, caller: Caller, Path(id): Path<Uuid>| async move {
                    Controller::new(CartTransformer, CartPresenter)
                        .intake(DeleteOrderItemRequest::new(caller, id))
                        .handle(|dto| module.pgpool().delete_order_item(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
