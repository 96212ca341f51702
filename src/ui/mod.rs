pub mod invoice_form;
