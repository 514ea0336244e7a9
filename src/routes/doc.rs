use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{AddToCartRequest, CartItemDto, CartList, UpdateCartItemRequest},
        catalog::{ProductCategoryList, ProductList, ServiceCategoryList, ServiceList},
        orders::{CreateOrderRequest, OrderList, OrderWithItems, PaymentMethod},
        promo::ValidatePromoRequest,
        sav::{CreateSavTicketRequest, SavTicketList, SavTicketType, UpdateSavTicketRequest},
        suggestions::{CreateSuggestionRequest, SuggestionCategory, SuggestionList},
    },
    models::{
        CartItem, Order, OrderItem, Product, ProductCategory, PromoCode, SavTicket, Service,
        ServiceCategory, ShippingAddress, Suggestion,
    },
    response::{ApiResponse, Meta},
    routes::{admin, cart, catalog, health, orders, params, promo, sav, suggestions},
};

struct SecurityAddon;

// Identity comes from the trusted gateway as plain headers, not a bearer token.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "gateway_identity",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "x-user-id",
                "Caller identity forwarded by the gateway (x-user-id, optional x-user-role)",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        catalog::list_products,
        catalog::get_product,
        catalog::list_product_categories,
        catalog::list_services,
        catalog::get_service,
        catalog::list_service_categories,
        cart::cart_list,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_from_cart,
        cart::clear_cart,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        promo::validate_promo,
        sav::create_ticket,
        sav::list_tickets,
        suggestions::create_suggestion,
        admin::list_all_orders,
        admin::update_order_status,
        admin::list_all_tickets,
        admin::update_ticket,
        admin::list_suggestions,
        admin::dashboard_stats
    ),
    components(
        schemas(
            Product,
            ProductCategory,
            Service,
            ServiceCategory,
            CartItem,
            CartItemDto,
            Order,
            OrderItem,
            ShippingAddress,
            SavTicket,
            Suggestion,
            PromoCode,
            AddToCartRequest,
            UpdateCartItemRequest,
            CreateOrderRequest,
            PaymentMethod,
            ValidatePromoRequest,
            CreateSavTicketRequest,
            UpdateSavTicketRequest,
            SavTicketType,
            CreateSuggestionRequest,
            SuggestionCategory,
            admin::UpdateOrderStatusRequest,
            admin::AdminStats,
            CartList,
            ProductList,
            ProductCategoryList,
            ServiceList,
            ServiceCategoryList,
            OrderList,
            OrderWithItems,
            SavTicketList,
            SuggestionList,
            params::Pagination,
            params::ProductQuery,
            params::ServiceQuery,
            params::OrderListQuery,
            params::TicketListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<ServiceList>,
            ApiResponse<CartList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<SavTicketList>,
            ApiResponse<admin::AdminStats>
        )
    ),
    security(
        ("gateway_identity" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Catalog", description = "Products, services and their categories"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Promo", description = "Promo code validation"),
        (name = "SAV", description = "After-sales ticket endpoints"),
        (name = "Suggestions", description = "Customer feedback intake"),
        (name = "Admin", description = "Back-office endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
