/// The transaction-detail join across all five tables.
///
/// Numeric outputs are rounded in SQL and the order date reduced to a bare
/// date, so the CSV carries exactly what the query returns.
pub const TRANSACTION_DETAIL_QUERY: &str = "\
SELECT
    c.customer_id,
    c.first_name || ' ' || c.last_name AS customer_name,
    c.email AS customer_email,
    c.customer_segment,
    o.order_id,
    DATE(o.order_date) AS order_date,
    o.status AS order_status,
    p.product_id,
    p.product_name,
    p.category AS product_category,
    oi.quantity,
    ROUND(oi.unit_price, 2) AS unit_price,
    ROUND(oi.discount, 2) AS discount,
    ROUND(oi.total, 2) AS item_total,
    ROUND(oi.quantity * oi.unit_price, 2) AS subtotal,
    ROUND(oi.quantity * oi.unit_price - oi.discount, 2) AS transaction_value,
    py.payment_method,
    py.status AS payment_status,
    ROUND(py.transaction_fee, 2) AS transaction_fee,
    ROUND(o.total_amount, 2) AS order_total
FROM customers c
    INNER JOIN orders o ON c.customer_id = o.customer_id
    INNER JOIN order_items oi ON o.order_id = oi.order_id
    INNER JOIN products p ON oi.product_id = p.product_id
    INNER JOIN payments py ON o.order_id = py.order_id
ORDER BY o.order_date DESC, o.order_id, oi.order_item_id";

pub const TOTAL_REVENUE_QUERY: &str = "\
SELECT COALESCE(SUM(payment_amount), 0) FROM payments WHERE status = 'Completed'";

pub const TOP_CATEGORY_QUERY: &str = "\
SELECT p.category FROM order_items oi
    INNER JOIN products p ON oi.product_id = p.product_id
GROUP BY p.category
ORDER BY SUM(oi.total) DESC, p.category
LIMIT 1";
