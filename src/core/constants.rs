// ==========================================
// CORS 白名单：只有这些来源的浏览器请求会被放行，其余来源一律拒绝。
// ==========================================

/// 允许跨域访问的来源列表（固定白名单）。
pub const ALLOWED_ORIGINS: [&str; 5] = [
    "https://woodhy-backend.onrender.com",
    "http://localhost:4001",
    "https://woodhy.vercel.app",
    "http://localhost:5173",
    "http://localhost:5000",
];

// ==========================================
// MongoDB 集合名称
// ==========================================

pub const COLLECTION_USERS: &str = "users";
pub const COLLECTION_PRODUCTS: &str = "products";

/// 一次性初始化标记，目前只存放首个管理员的认领记录。
pub const COLLECTION_BOOTSTRAP: &str = "bootstrap";
pub const FIRST_ADMIN_CLAIM: &str = "first_admin";

/// 未配置 MONGO_DB_NAME 且连接串中也没有默认库时使用的数据库名。
pub const DEFAULT_DB_NAME: &str = "woodhy";

/// MongoDB 唯一索引冲突的错误码（E11000 duplicate key）。
pub const DUPLICATE_KEY_CODE: i32 = 11000;

// ==========================================
// 业务逻辑常量
// ==========================================

/// 根路径返回的欢迎语。
pub const WELCOME_MESSAGE: &str = "Welcome to the API";

/// 访问令牌有效期上限（秒）：一年。
pub const MAX_JWT_EXPIRATION: i64 = 86400 * 365;

/// 日志级别默认值：配置加载失败时同样使用它初始化日志系统。
pub const DEFAULT_LOG_LEVEL: &str = "info";

// 商品列表分页默认值与上限
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// 商品列表允许排序的字段。
pub const PRODUCT_SORT_FIELDS: [&str; 4] = ["name", "price", "created_at", "stock"];

/// 商品列表默认排序：最新创建的在前。
pub const DEFAULT_PRODUCT_SORT: &str = "-created_at";
