//! Fixture datasets written as CSV files.
//!
//! Each constant is the full contents of one backing file. The expected
//! values asserted by the tests are derived from these rows by hand.

pub const CUSTOMERS: &str = "\
shopUserId,invoiceCountryId,city
1,205,Stockholm
2,205,Lund
3,58,Aarhus
4,999,Berlin
5,160,Oslo
5,160,Oslo
";

pub const TRANSACTIONS: &str = "\
orderId,shopUserId,price,quantity,invoiceCountryId,created,type
o1,1,100,2,205,2024-06-03 10:00:00,Web
o1,1,50,1,205,2024-06-03 10:00:00,Web
o2,1,200,1,205,2024-07-01 09:00:00,web
o3,3,1000,1,58,2024-06-10 12:00:00,Telephone
o4,5,300,1,160,2024-06-11 12:00:00,Email
";

pub const CUSTOMER_SUMMARY: &str = "\
country,age,gender
Sweden,34,female
Sweden,34,Female
Sweden,51,male
Norway,28,Female
Norway,,Male
";

pub const COUNTRY_SUMMARY: &str = "\
country,total_revenue_sek,total_orders
Sweden,1500000,1000
Denmark,\"250 000,50\",0
";

pub const CITY_SUMMARY: &str = "\
country,city,customers_count,total_revenue_sek,total_orders
Sweden,Stockholm,40,\"12 500\",10
Sweden,Unknown,99,99000,99
Sweden,Lund,12,1499,0
Norway,Oslo,7,2500,2
";

pub const CITY_MONTHLY_REVENUE: &str = "\
country,city,year_month,total_revenue_sek
Sweden,Stockholm,2024-06,1500
Sweden,Lund,2024-06,600
Sweden,Stockholm,2024-08,2500
Norway,Oslo,2024-07,999
Denmark,Aarhus,2024-05,5000
";

pub const COUNTRIES_BY_CHANNEL: &str = "\
country,channel,customers_count
Sweden,web,10
Sweden,Online,5
Sweden,Store,3
Norway,Telephone,4
";

pub const COUNTRIES_BY_CHANNEL_BY_MONTH: &str = "\
country,channel,year_month,customers_count
Sweden,Web,2024-07,5
Sweden,Web,2024-06,3
Sweden,Email,2024-06,n/a
";

pub const RETURN_BUCKETS: &str = "\
bucket,customers
2 months,5
week 1,10
2 months,1
> 1 year,2
";

pub const TOP_BRANDS: &str = "\
country,brand,count,rank
Sweden,Acme,50,2
Sweden,Nordic,80,1
Sweden,Acme,50,2
Norway,Fjord,30,1
";

pub const TOP_CATEGORIES: &str = "\
country,season_label,category,count,rank
Sweden,Summer 2024,Shoes,40,1
Sweden,Summer 2024,Bags,30,2
Sweden,Winter 2024,Coats,70,1
";

pub const TOP_GROUPS: &str = "\
country,season_label,value,name,brand,count,rank
Sweden,Summer 2024,1001,Runner,Acme,40,1
Sweden,Summer 2024,1002,Sandal,Acme,30,2
Sweden,Winter 2024,2001,Parka,Nordic,70,1
";

pub const TOP_REPURCHASE: &str = "\
country,value,name,brand,repurchasers,rank
Sweden,1001,Runner,Acme,12,1
Norway,3001,Boot,Fjord,4,1
";

pub const COOCCURRING_GROUPS: &str = "\
group_a,group_b,count
Runner,Sandal,12
Runner,Parka,5
Sandal,Parka,2
";

pub const COMPLEMENTS: &str = "\
product,complement,lift
Runner,Socks,2.5
";

pub const BASKET_CF: &str = "\
Product ID,Top 10,Top 2,Top 1,extra
1001,2010,2002,2001,x
";

pub const SEMANTIC_SIMILARITY_RECS: &str = "\
product,similar,similarity
1001,1002,0.93
";

pub const TOP_SAME_BRAND: &str = "\
brand,product,rank
Acme,Runner,1
";

pub const HYBRID: &str = "\
product,recommendation,score,Score (cf)
1001,1002,0.9,0.8
";

/// Every backing file of the default catalog with its contents.
pub fn all() -> Vec<(&'static str, &'static str)> {
    vec![
        ("customers_clean.csv", CUSTOMERS),
        ("transactions_clean.csv", TRANSACTIONS),
        ("customer_summary.csv", CUSTOMER_SUMMARY),
        ("country_summary.csv", COUNTRY_SUMMARY),
        ("city_summary.csv", CITY_SUMMARY),
        ("city_monthly_revenue.csv", CITY_MONTHLY_REVENUE),
        ("countries_by_channel.csv", COUNTRIES_BY_CHANNEL),
        (
            "countries_by_channel_by_month.csv",
            COUNTRIES_BY_CHANNEL_BY_MONTH,
        ),
        ("return_buckets.csv", RETURN_BUCKETS),
        ("top_brands.csv", TOP_BRANDS),
        ("top_categories.csv", TOP_CATEGORIES),
        ("top_groups.csv", TOP_GROUPS),
        ("top_repurchase.csv", TOP_REPURCHASE),
        ("cooccurring_groups.csv", COOCCURRING_GROUPS),
        ("complements.csv", COMPLEMENTS),
        ("basket_cf.csv", BASKET_CF),
        ("semantic_similarity_recs.csv", SEMANTIC_SIMILARITY_RECS),
        ("top_same_brand.csv", TOP_SAME_BRAND),
        ("hybrid.csv", HYBRID),
    ]
}
