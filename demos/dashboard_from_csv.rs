use fiscal_dashboard_core::{
    build_dashboard, ingestion, DashboardRequest, DateRange, MetricSelection, TableStyle,
};
use std::env;
use std::io::Write;
use std::path::PathBuf;

fn main() {
    let path = match env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => write_sample_csv(),
    };

    let is_xlsx = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("xlsx")
    );
    let frame = if is_xlsx {
        ingestion::read_xlsx(&path)
    } else {
        ingestion::read_csv(&path)
    }
    .expect("source should be readable tabular data");

    let request = DashboardRequest {
        metrics: MetricSelection::all(),
        range: Some(DateRange::months("2023-01", "2023-12").expect("valid month bounds")),
        table: TableStyle::default(),
    };

    let dashboard = build_dashboard(frame, &request);

    for advisory in &dashboard.advisories {
        println!("advisory: {}", advisory);
    }

    println!("Total Vendas:  {:.2}", dashboard.summary.sales);
    println!("Total Compras: {:.2}", dashboard.summary.purchases);
    println!("Total DAS:     {:.2}", dashboard.summary.das);
    println!("Total Folha:   {:.2}", dashboard.summary.payroll);
    println!();

    println!("{}", dashboard.table.columns.join(" | "));
    for row in &dashboard.table.rows {
        println!("{}", row.join(" | "));
    }
}

fn write_sample_csv() -> PathBuf {
    let path = env::temp_dir().join("movimento_fiscal_sample.csv");
    let mut file = std::fs::File::create(&path).expect("temp dir should be writable");
    write!(
        file,
        "MÊS,VENDAS,COMPRAS,DAS,FOLHA\n\
         2023-01,\"10.500,00\",\"4.200,00\",630,2100\n\
         2023-02,\"12.300,50\",\"5.100,00\",738,2100\n\
         2023-03,\"9.800,00\",\"3.950,75\",588,2100\n"
    )
    .expect("sample csv should write");
    println!("No input given; using generated sample {}\n", path.display());
    path
}
