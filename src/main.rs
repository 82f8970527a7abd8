use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info, Instrument};

use storefront_client::api::{HttpApi, ProductDraft};
use storefront_client::app_system::{setup_tracing, ClientConfig, StoreSystem};
use storefront_client::clients::{closed_orders, filter_products, OrderBoard};
use storefront_client::domain::{Order, Price, Product, ProductId};
use storefront_client::load_state::LoadState;
use storefront_client::storage::{FileStorage, LocalStorage};

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Procurement storefront client", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ClientConfig,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and remember the session
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// List the catalog
    Products {
        /// Case-insensitive title filter
        #[arg(long)]
        search: Option<String>,
    },
    /// Inspect or change the cart
    #[command(subcommand)]
    Cart(CartCommand),
    /// Submit orders for the cart (or a single line of it)
    Checkout {
        #[arg(long)]
        product: Option<ProductId>,
    },
    /// Current orders grouped by status
    Orders,
    /// Rejected and dispatched orders
    History,
    /// Manage your own products (supplier accounts)
    #[command(subcommand)]
    Supplier(SupplierCommand),
    /// List product categories
    Categories,
    /// Request a password reset email
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Delete the locally stored session and cart
    Reset,
}

#[derive(Debug, Subcommand)]
enum CartCommand {
    Show,
    Add {
        product_id: ProductId,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    Remove {
        product_id: ProductId,
    },
    Clear,
}

#[derive(Debug, Subcommand)]
enum SupplierCommand {
    List,
    Create(DraftArgs),
    Update {
        id: ProductId,
        #[command(flatten)]
        draft: DraftArgs,
    },
    Delete {
        id: ProductId,
    },
}

#[derive(Debug, clap::Args)]
struct DraftArgs {
    #[arg(long, default_value = "")]
    title: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    price: Option<Price>,
    #[arg(long)]
    stock: Option<u32>,
    #[arg(long)]
    category: Option<u64>,
    /// Image URL
    #[arg(long)]
    image: Option<String>,
}

impl From<DraftArgs> for ProductDraft {
    fn from(args: DraftArgs) -> Self {
        ProductDraft {
            title: args.title,
            description: args.description,
            price: args.price,
            stock: args.stock,
            category_id: args.category,
            image: args.image,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::load().map_err(|e| e.to_string())?;
    setup_tracing(&cli.config.log_level);

    let data_dir = cli.config.data_dir().map_err(|e| e.to_string())?;
    let storage = FileStorage::new(data_dir);

    if let Command::Reset = cli.command {
        storage.clear().await.map_err(|e| e.to_string())?;
        println!("Local session and cart removed");
        return Ok(());
    }

    let api = HttpApi::new(cli.config.api_url.clone());
    info!(api_url = %api.base_url(), "Starting storefront client");

    let system = StoreSystem::new(Arc::new(storage), Arc::new(api), cli.config.mailbox_size);

    let span = tracing::info_span!("command");
    let result = run(&system, cli.command).instrument(span).await;
    if let Err(e) = &result {
        error!(error = %e, "Command failed");
    }

    system.shutdown().await?;
    result
}

async fn run(system: &StoreSystem, command: Command) -> Result<(), String> {
    match command {
        Command::Login { username, password } => {
            let session = system
                .account
                .login(&username, &password)
                .await
                .map_err(|e| e.to_string())?;
            println!("Logged in as {} ({})", session.username, session.user_type.as_str());
        }
        Command::Logout => {
            system.account.logout().await.map_err(|e| e.to_string())?;
            println!("Logged out");
        }
        Command::Products { search } => {
            let products = load_products(system).await?;
            let shown = match search {
                Some(query) => filter_products(&products, &query),
                None => products,
            };
            print_products(&shown);
        }
        Command::Cart(cart) => run_cart(system, cart).await?,
        Command::Checkout { product } => checkout(system, product).await?,
        Command::Orders => {
            let orders = load_orders(system).await?;
            let board = OrderBoard::partition(orders);
            for (label, orders) in [
                ("Pending", &board.pending),
                ("Reviewed", &board.reviewed),
                ("Approved", &board.approved),
                ("Declined", &board.declined),
            ] {
                println!("{label} ({})", orders.len());
                print_orders(orders);
            }
        }
        Command::History => {
            let orders = load_orders(system).await?;
            let closed = closed_orders(&orders);
            if closed.is_empty() {
                println!("No closed orders");
            }
            print_orders(&closed);
        }
        Command::Supplier(supplier) => run_supplier(system, supplier).await?,
        Command::Categories => {
            let categories = system.catalog.categories().await.map_err(|e| e.to_string())?;
            for category in categories {
                println!("{:>4}  {}", category.id, category.name);
            }
        }
        Command::ForgotPassword { email } => {
            system
                .account
                .forgot_password(&email)
                .await
                .map_err(|e| e.to_string())?;
            println!("Password reset link sent to {email}");
        }
        // Runs before the system starts so the services never restore stale data
        Command::Reset => {}
    }
    Ok(())
}

async fn run_cart(system: &StoreSystem, command: CartCommand) -> Result<(), String> {
    match command {
        CartCommand::Show => {
            let lines = system.cart.lines().await.map_err(|e| e.to_string())?;
            if lines.is_empty() {
                println!("Your cart is empty");
                return Ok(());
            }
            for line in &lines {
                println!(
                    "{:>4}  {:<30} x{:<3} {}",
                    line.product_id,
                    line.display_title(),
                    line.quantity,
                    line.line_total()
                );
            }
            let total = system.cart.total().await.map_err(|e| e.to_string())?;
            println!("Total: {total:.2}");
        }
        CartCommand::Add {
            product_id,
            quantity,
        } => {
            let products = load_products(system).await?;
            let product = products
                .into_iter()
                .find(|product| product.id == Some(product_id))
                .ok_or_else(|| format!("Product {product_id} not found"))?;
            let title = product.display_title().to_string();
            system
                .cart
                .add_item(product, quantity)
                .await
                .map_err(|e| e.to_string())?;
            println!("Added {quantity} x {title}");
        }
        CartCommand::Remove { product_id } => {
            system
                .cart
                .remove_item(product_id)
                .await
                .map_err(|e| e.to_string())?;
            println!("Removed product {product_id}");
        }
        CartCommand::Clear => {
            system.cart.remove_all().await.map_err(|e| e.to_string())?;
            println!("Cart cleared");
        }
    }
    Ok(())
}

async fn checkout(system: &StoreSystem, product: Option<ProductId>) -> Result<(), String> {
    match product {
        Some(product_id) => {
            let lines = system.cart.lines().await.map_err(|e| e.to_string())?;
            let line = lines
                .into_iter()
                .find(|line| line.product_id == product_id)
                .ok_or_else(|| format!("Product {product_id} is not in the cart"))?;
            system
                .orders
                .submit_single(line)
                .await
                .map_err(|e| e.to_string())?;
            println!("Order submitted");
        }
        None => {
            let receipt = system.orders.submit_all().await.map_err(|e| e.to_string())?;
            println!(
                "Submitted {} order(s), total {:.2}",
                receipt.submitted, receipt.total
            );
        }
    }
    Ok(())
}

async fn run_supplier(system: &StoreSystem, command: SupplierCommand) -> Result<(), String> {
    match command {
        SupplierCommand::List => {
            let products = system
                .supplier
                .my_products()
                .await
                .map_err(|e| e.to_string())?;
            print_products(&products);
        }
        SupplierCommand::Create(draft) => {
            let product = system
                .supplier
                .create_product(draft.into())
                .await
                .map_err(|e| e.to_string())?;
            println!("Created {}", product.display_title());
        }
        SupplierCommand::Update { id, draft } => {
            let product = system
                .supplier
                .update_product(id, draft.into())
                .await
                .map_err(|e| e.to_string())?;
            println!("Updated {}", product.display_title());
        }
        SupplierCommand::Delete { id } => {
            system
                .supplier
                .delete_product(id)
                .await
                .map_err(|e| e.to_string())?;
            println!("Deleted product {id}");
        }
    }
    Ok(())
}

async fn load_products(system: &StoreSystem) -> Result<Vec<Product>, String> {
    let mut state = LoadState::Idle;
    state.track(system.catalog.fetch_products()).await;
    match state {
        LoadState::Success(products) => Ok(products),
        LoadState::Failure(e) => Err(e.to_string()),
        LoadState::Idle | LoadState::Loading => Err("Products did not load".to_string()),
    }
}

async fn load_orders(system: &StoreSystem) -> Result<Vec<Order>, String> {
    let mut state = LoadState::Idle;
    state.track(system.history.fetch_orders()).await;
    match state {
        LoadState::Success(orders) => Ok(orders),
        LoadState::Failure(e) => Err(e.to_string()),
        LoadState::Idle | LoadState::Loading => Err("Orders did not load".to_string()),
    }
}

fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("No products found");
    }
    for product in products {
        let price = product
            .price
            .map(|price| price.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>4}  {:<30} {:>10}  stock {}",
            product.id.map(|id| id.to_string()).unwrap_or_default(),
            product.display_title(),
            price,
            product.stock
        );
    }
}

fn print_orders(orders: &[Order]) {
    for order in orders {
        let titles: Vec<String> = order
            .products
            .iter()
            .map(|product| match (product.title(), product.id()) {
                (Some(title), _) => title.to_string(),
                (None, Some(id)) => format!("#{id}"),
                (None, None) => "?".to_string(),
            })
            .collect();
        println!(
            "  #{:<5} {:<10} [{}] {}",
            order.id,
            order.display_status().label(),
            order.display_status().color(),
            titles.join(", ")
        );
    }
}
